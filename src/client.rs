//! Client profile: the shared, call-independent baseline configuration.
//!
//! A profile is built once, then spawns any number of per-call composers via
//! [`HttpClient::request`]. Every setter takes `mut self` and returns `Self`,
//! so configuration is an owned builder chain; once a profile is shared it is
//! read-only, and composers never write back into it.

use std::time::Duration;

use url::Url;

use crate::config::ClientConfig;
use crate::error::HttpError;
use crate::multimap::MultiMap;
use crate::request::HttpRequest;

/// A reusable HTTP client profile: host, prefix, timeouts, redirect budget,
/// default headers and default queries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: reqwest::Client,
    host: String,
    url_prefix: String,
    max_redirects: u32,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_headers: MultiMap,
    default_queries: MultiMap,
}

impl HttpClient {
    /// Build a profile from a configuration.
    ///
    /// When the configuration carries no transport, a default `reqwest`
    /// client is built with automatic redirects disabled — the submission
    /// engine enforces the redirect budget itself, so a caller-supplied
    /// transport must also leave redirects unfollowed.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let transport = match config.transport {
            Some(client) => client,
            None => reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?,
        };

        Ok(Self {
            transport,
            host: config.host.trim().to_string(),
            url_prefix: config.url_prefix.trim().to_string(),
            max_redirects: config.max_redirects,
            timeout: config.timeout,
            user_agent: config.user_agent,
            default_headers: MultiMap::new(),
            default_queries: MultiMap::new(),
        })
    }

    /// Build a profile for `host` from the baked-in default configuration
    /// (redirect budget 10, timeout 60 s, library user-agent), with an
    /// optional URL prefix.
    ///
    /// ```rust,no_run
    /// use httpline::HttpClient;
    ///
    /// let api = HttpClient::for_host("https://api.example.com", "v1")?;
    /// let bare = HttpClient::for_host("https://example.com", None)?;
    /// # Ok::<(), httpline::HttpError>(())
    /// ```
    pub fn for_host<'p>(
        host: impl Into<String>,
        prefix: impl Into<Option<&'p str>>,
    ) -> Result<Self, HttpError> {
        let mut client = Self::new(ClientConfig::default())?.with_host(host);
        if let Some(prefix) = prefix.into() {
            client = client.with_url_prefix(prefix);
        }
        Ok(client)
    }

    /// Spawn a per-call request composer bound to this profile.
    pub fn request(&self) -> HttpRequest<'_> {
        HttpRequest::new(self)
    }

    // ========================================================================
    // Chainable configuration
    // ========================================================================

    /// Replace the transport.
    pub fn with_transport(mut self, transport: reqwest::Client) -> Self {
        self.transport = transport;
        self
    }

    /// Set the base host, e.g. `https://api.example.com`.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim().to_string();
        self
    }

    /// Set the URL prefix applied between host and request path.
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into().trim().to_string();
        self
    }

    /// Set the default redirect budget.
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Set the default request timeout. Zero means no timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the default request timeout entirely.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the default `User-Agent` value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the default headers wholesale.
    pub fn with_default_headers(mut self, headers: MultiMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Add a single default header, keeping any existing values.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.append(key, value);
        self
    }

    /// Replace the default queries wholesale.
    pub fn with_default_queries(mut self, queries: MultiMap) -> Self {
        self.default_queries = queries;
        self
    }

    /// Add a single default query pair, keeping any existing values.
    pub fn with_default_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_queries.append(key, value);
        self
    }

    // ========================================================================
    // Derived getters
    // ========================================================================

    /// The transport this profile submits through.
    pub fn transport(&self) -> &reqwest::Client {
        &self.transport
    }

    /// The normalized host: `scheme://host[:port]` with no path and no
    /// trailing slash. A malformed host normalizes to the empty string —
    /// the profile then has no host configured, and a later submission with
    /// a relative path fails with [`HttpError::ConfigurationMissing`].
    pub fn host(&self) -> String {
        normalize_host(&self.host)
    }

    /// The normalized prefix: exactly one leading slash and no trailing
    /// slash, or empty when no prefix is configured.
    pub fn url_prefix(&self) -> String {
        normalize_prefix(&self.url_prefix)
    }

    /// The default redirect budget.
    pub fn max_redirects(&self) -> u32 {
        self.max_redirects
    }

    /// The default timeout, `None` meaning no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The default `User-Agent` value, if configured.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Default headers applied to every submission unless skipped.
    pub fn default_headers(&self) -> &MultiMap {
        &self.default_headers
    }

    /// Default queries applied to every submission unless skipped.
    pub fn default_queries(&self) -> &MultiMap {
        &self.default_queries
    }
}

/// Parse `raw` and re-emit only scheme and authority. Malformed input
/// normalizes to the empty string.
fn normalize_host(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return String::new();
    };
    match url.origin() {
        origin @ url::Origin::Tuple(..) => origin.ascii_serialization(),
        url::Origin::Opaque(_) => String::new(),
    }
}

/// Trim surrounding slashes, then re-prepend exactly one leading slash.
/// Empty input yields empty output.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_normalized_to_scheme_and_authority() {
        let client = HttpClient::for_host("https://api.example.com/ignored/path", None).unwrap();
        assert_eq!(client.host(), "https://api.example.com");
    }

    #[test]
    fn host_normalization_is_idempotent() {
        let once = normalize_host("https://api.example.com:8443");
        assert_eq!(once, "https://api.example.com:8443");
        assert_eq!(normalize_host(&once), once);
    }

    #[test]
    fn default_port_is_elided() {
        assert_eq!(
            normalize_host("https://api.example.com:443"),
            "https://api.example.com"
        );
    }

    #[test]
    fn malformed_host_normalizes_to_empty() {
        let client = HttpClient::for_host("not a url", None).unwrap();
        assert_eq!(client.host(), "");
        assert_eq!(normalize_host("data:text/plain,hi"), "");
    }

    #[test]
    fn prefix_gets_exactly_one_leading_slash() {
        assert_eq!(normalize_prefix("v1"), "/v1");
        assert_eq!(normalize_prefix("/v1/"), "/v1");
        assert_eq!(normalize_prefix("//v1//"), "/v1");
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[test]
    fn setters_chain_and_getters_derive() {
        let client = HttpClient::for_host("https://api.example.com", None)
            .unwrap()
            .with_url_prefix(" /v2/ ")
            .with_max_redirects(3)
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("custom/1.0")
            .with_default_header("X-Key", "secret")
            .with_default_query("active", "true");

        assert_eq!(client.url_prefix(), "/v2");
        assert_eq!(client.max_redirects(), 3);
        assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(client.user_agent(), Some("custom/1.0"));
        assert_eq!(client.default_headers().get_first("x-key"), Some("secret"));
        assert_eq!(client.default_queries().get_first("active"), Some("true"));
    }

    #[test]
    fn composers_do_not_mutate_their_profile() {
        let client = HttpClient::for_host("https://api.example.com", None).unwrap();
        {
            let _first = client.request().header("X-A", "1").query("a", "1");
            let _second = client.request().header("X-B", "2");
        }
        assert!(client.default_headers().is_empty());
        assert!(client.default_queries().is_empty());
    }
}
