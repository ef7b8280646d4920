//! Client profile configuration.
//!
//! `ClientConfig` is the declarative form of a profile: plain data, no
//! transport baked in yet. `ClientConfig::default()` is the baked-in
//! convenience profile used by [`HttpClient::for_host`](crate::client::HttpClient::for_host).

use std::time::Duration;

use crate::defaults;

/// Configuration for building an [`HttpClient`](crate::client::HttpClient) profile.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Caller-supplied transport. When `None`, a default `reqwest` client is
    /// built with automatic redirects disabled (the submission engine
    /// enforces the redirect budget itself).
    pub transport: Option<reqwest::Client>,
    /// Base host, e.g. `https://api.example.com`. Stored raw; normalized on read.
    pub host: String,
    /// Path prefix applied between host and request path, e.g. `v1`.
    pub url_prefix: String,
    /// Redirect budget: the number of hops a single submission may follow.
    pub max_redirects: u32,
    /// Request timeout. `None` or zero means no timeout.
    pub timeout: Option<Duration>,
    /// Default `User-Agent` header. `None` or empty adds no header.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: None,
            host: String::new(),
            url_prefix: String::new(),
            max_redirects: defaults::MAX_REDIRECTS,
            timeout: Some(defaults::TIMEOUT),
            user_agent: Some(defaults::USER_AGENT.to_string()),
        }
    }
}
