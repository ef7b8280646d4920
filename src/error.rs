//! Error types for the client.
//!
//! Every failure is surfaced to the immediate caller of `submit`/`parse_json`/
//! `parse_as`; nothing is logged, retried, or swallowed inside the crate.
//! Retry and backoff policy belong to the caller.

use thiserror::Error;

/// Errors produced by profile configuration, request submission, and
/// response parsing.
#[derive(Debug, Error)]
pub enum HttpError {
    /// No usable host: the profile host is empty or failed to normalize, and
    /// the request path did not carry its own authority.
    #[error("client configuration is missing a usable host")]
    ConfigurationMissing,

    /// The redirect budget was exhausted mid-call. A budget of N permits
    /// exactly N hops; the (N+1)-th redirect fails with this error.
    #[error("too many redirects (budget of {budget} exhausted)")]
    TooManyRedirects {
        /// The effective budget that was exhausted.
        budget: u32,
    },

    /// The request path could not be parsed as a usable URL reference.
    #[error("malformed request path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// The assembled target URL (or a redirect `Location`) is not a valid URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request method is not a valid HTTP method token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// A header name or value was rejected by the transport.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// Transport-level failure (network, TLS, protocol), passed through
    /// unmodified from the underlying call.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The effective timeout elapsed before the call completed.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The caller triggered the cancellation token bound to this request.
    #[error("request cancelled")]
    Cancelled,

    /// JSON parsing was requested but the response `content-type` is not the
    /// exact literal `application/json`.
    #[error("not a JSON response (content-type: {content_type:?})")]
    NotJson {
        /// The `content-type` the response actually carried, if any.
        content_type: Option<String>,
    },

    /// JSON parsing was requested on a zero-length body.
    #[error("response body is empty")]
    EmptyBody,

    /// The body claimed to be JSON but failed to decode.
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),
}

impl HttpError {
    /// Whether this error came out of the underlying transport (network,
    /// TLS, protocol), including timeout and cancellation.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout(_) | Self::Cancelled
        )
    }

    /// Whether this error is the exhausted redirect budget.
    pub fn is_redirect_exhausted(&self) -> bool {
        matches!(self, Self::TooManyRedirects { .. })
    }
}
