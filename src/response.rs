//! Normalized response envelope.
//!
//! Constructed exactly once per submission by draining the raw response body;
//! immutable afterwards. Header names are normalized to lowercase (the
//! transport header map guarantees this) and lookup accepts any casing.

use std::net::SocketAddr;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::HttpError;

/// Raw response metadata kept as an escape hatch after the body has been
/// drained.
#[derive(Debug, Clone)]
pub struct HttpResponseInfo {
    /// Final URL, after any redirect hops.
    pub url: Url,
    /// Negotiated HTTP version.
    pub version: Version,
    /// Remote peer address, when known.
    pub remote_addr: Option<SocketAddr>,
    /// Server-reported content length, if any.
    pub content_length: Option<u64>,
}

/// A fully buffered, classification-aware HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    info: HttpResponseInfo,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Drain and close the raw response body and capture its metadata. The
    /// body stream is read exactly once, here.
    pub(crate) async fn from_raw(response: reqwest::Response) -> Result<Self, HttpError> {
        let info = HttpResponseInfo {
            url: response.url().clone(),
            version: response.version(),
            remote_addr: response.remote_addr(),
            content_length: response.content_length(),
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Self {
            info,
            status,
            headers,
            body,
        })
    }

    /// Metadata of the raw response this envelope was built from.
    pub fn original(&self) -> &HttpResponseInfo {
        &self.info
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response status as a bare integer.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// True for statuses in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status.as_u16())
    }

    /// True for statuses in `[400, 500)`.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status.as_u16())
    }

    /// True for statuses of 500 and above.
    pub fn is_server_error(&self) -> bool {
        self.status.as_u16() >= 500
    }

    /// All response headers, names lowercased, multi-valued.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether a header is present; `key` may use any casing.
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    /// The first value of a header; `key` may use any casing. Values that
    /// are not valid UTF-8 are reported as absent.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|value| value.to_str().ok())
    }

    /// The fully buffered body bytes.
    pub fn content(&self) -> &[u8] {
        &self.body
    }

    /// True only when `content-type` is the exact literal `application/json`.
    /// A parameterized value such as `application/json; charset=utf-8` is not
    /// recognized.
    pub fn is_json(&self) -> bool {
        self.get_header("content-type") == Some("application/json")
    }

    /// Parse the body as untyped JSON.
    ///
    /// Fails with [`HttpError::EmptyBody`] on a zero-length body and
    /// [`HttpError::NotJson`] when the content-type check fails.
    pub fn parse_json(&self) -> Result<serde_json::Value, HttpError> {
        self.check_parseable()?;
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parse the body as JSON into a caller-supplied type.
    ///
    /// The empty-body check runs first, so [`HttpError::EmptyBody`] is
    /// returned regardless of content type.
    pub fn parse_as<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        self.check_parseable()?;
        Ok(serde_json::from_slice(&self.body)?)
    }

    fn check_parseable(&self) -> Result<(), HttpError> {
        if self.body.is_empty() {
            return Err(HttpError::EmptyBody);
        }
        if !self.is_json() {
            return Err(HttpError::NotJson {
                content_type: self.get_header("content-type").map(str::to_string),
            });
        }
        Ok(())
    }
}
