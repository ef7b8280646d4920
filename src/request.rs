//! Per-call request composer.
//!
//! An `HttpRequest` is spawned from a profile, accumulates overrides without
//! ever touching the profile, and is consumed by [`submit`](HttpRequest::submit).
//! The verb shortcuts (`get`, `post`, ...) and [`send`](HttpRequest::send) are
//! thin sequencing helpers over `submit`.

use std::time::Duration;

use crate::cancel::CancelHandle;
use crate::client::HttpClient;
use crate::error::HttpError;
use crate::execution;
use crate::multimap::MultiMap;
use crate::response::HttpResponse;

/// A single outgoing request under composition. Consumed on submission; no
/// two submissions ever share its state.
#[derive(Debug, Clone)]
pub struct HttpRequest<'a> {
    pub(crate) client: &'a HttpClient,
    pub(crate) cancel: Option<CancelHandle>,
    pub(crate) user_agent: Option<String>,
    pub(crate) max_redirects: Option<u32>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) headers: MultiMap,
    pub(crate) skip_default_headers: bool,
    pub(crate) queries: MultiMap,
    pub(crate) skip_default_queries: bool,
    pub(crate) body: Vec<u8>,
    pub(crate) method: String,
    pub(crate) path: String,
}

impl<'a> HttpRequest<'a> {
    pub(crate) fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            cancel: None,
            user_agent: None,
            max_redirects: None,
            timeout: None,
            headers: MultiMap::new(),
            skip_default_headers: false,
            queries: MultiMap::new(),
            skip_default_queries: false,
            body: Vec::new(),
            method: String::new(),
            path: String::new(),
        }
    }

    /// Bind a cancellation handle; triggering it aborts the in-flight call.
    pub fn cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Override the `User-Agent` for this call only.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the redirect budget for this call only.
    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    /// Fail on the first redirect: a budget of zero.
    pub fn no_redirect(self) -> Self {
        self.max_redirects(0)
    }

    /// Override the timeout for this call only. Zero means no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Clear the timeout override, falling back to the profile default.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Replace the call headers wholesale.
    pub fn headers(mut self, headers: MultiMap) -> Self {
        self.headers = headers;
        self
    }

    /// Add a single header, case preserved, keeping any existing values.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(key, value);
        self
    }

    /// Suppress the profile's default headers for this call.
    pub fn skip_default_headers(mut self) -> Self {
        self.skip_default_headers = true;
        self
    }

    /// Replace the call queries wholesale.
    pub fn queries(mut self, queries: MultiMap) -> Self {
        self.queries = queries;
        self
    }

    /// Add a single query pair, keeping any existing values.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.queries.append(key, value);
        self
    }

    /// Suppress the profile's default queries for this call.
    pub fn skip_default_queries(mut self) -> Self {
        self.skip_default_queries = true;
        self
    }

    /// Set the request body bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the request method, uppercased on set.
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.method = method.as_ref().to_ascii_uppercase();
        self
    }

    /// Set the request path, whitespace-trimmed on set. May be relative or a
    /// full absolute URL; an absolute URL replaces the profile host and
    /// prefix for this call only.
    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.path = path.as_ref().trim().to_string();
        self
    }

    // ========================================================================
    // Terminal operations
    // ========================================================================

    /// Resolve the target URL, merge headers and queries, enforce the
    /// redirect budget, execute the call, and wrap the response.
    pub async fn submit(self) -> Result<HttpResponse, HttpError> {
        execution::submit(self).await
    }

    /// Set method, path, body, and headers, then submit.
    pub async fn send(
        self,
        method: &str,
        path: &str,
        body: impl Into<Vec<u8>>,
        headers: MultiMap,
    ) -> Result<HttpResponse, HttpError> {
        self.method(method)
            .path(path)
            .body(body)
            .headers(headers)
            .submit()
            .await
    }

    /// Submit as `GET`, optionally setting the path first.
    pub async fn get<'p>(
        self,
        path: impl Into<Option<&'p str>>,
    ) -> Result<HttpResponse, HttpError> {
        self.verb("GET", path).await
    }

    /// Submit as `POST`, optionally setting the path first.
    pub async fn post<'p>(
        self,
        path: impl Into<Option<&'p str>>,
    ) -> Result<HttpResponse, HttpError> {
        self.verb("POST", path).await
    }

    /// Submit as `PUT`, optionally setting the path first.
    pub async fn put<'p>(
        self,
        path: impl Into<Option<&'p str>>,
    ) -> Result<HttpResponse, HttpError> {
        self.verb("PUT", path).await
    }

    /// Submit as `PATCH`, optionally setting the path first.
    pub async fn patch<'p>(
        self,
        path: impl Into<Option<&'p str>>,
    ) -> Result<HttpResponse, HttpError> {
        self.verb("PATCH", path).await
    }

    /// Submit as `DELETE`, optionally setting the path first.
    pub async fn delete<'p>(
        self,
        path: impl Into<Option<&'p str>>,
    ) -> Result<HttpResponse, HttpError> {
        self.verb("DELETE", path).await
    }

    async fn verb<'p>(
        mut self,
        method: &str,
        path: impl Into<Option<&'p str>>,
    ) -> Result<HttpResponse, HttpError> {
        self = self.method(method);
        if let Some(path) = path.into() {
            self = self.path(path);
        }
        self.submit().await
    }
}
