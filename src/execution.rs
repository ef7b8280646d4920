//! Submission engine.
//!
//! Consumes a composed request exactly once: resolves the effective target
//! URL, merges headers and queries additively, enforces the per-call redirect
//! budget, executes the call under the effective timeout, and wraps the raw
//! response into an [`HttpResponse`].
//!
//! The engine performs no retry and no error translation: transport failures
//! are returned to the caller unmodified.

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, trace};
use url::Url;

use crate::client::HttpClient;
use crate::error::HttpError;
use crate::multimap::MultiMap;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

/// Redirect budget for a single submission. Freshly allocated per call;
/// never shared across concurrent submissions.
#[derive(Debug)]
struct RedirectBudget {
    budget: u32,
    remaining: u32,
}

impl RedirectBudget {
    fn new(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
        }
    }

    /// Spend one hop. A budget of N permits exactly N hops; the (N+1)-th
    /// redirect fails.
    fn spend(&mut self) -> Result<(), HttpError> {
        if self.remaining == 0 {
            return Err(HttpError::TooManyRedirects {
                budget: self.budget,
            });
        }
        self.remaining -= 1;
        Ok(())
    }
}

pub(crate) async fn submit(request: HttpRequest<'_>) -> Result<HttpResponse, HttpError> {
    let HttpRequest {
        client,
        cancel,
        user_agent,
        max_redirects,
        timeout,
        headers,
        skip_default_headers,
        queries,
        skip_default_queries,
        body,
        method,
        path,
    } = request;

    let url = resolve_target(client, &path, queries, skip_default_queries)?;
    let method = parse_method(&method)?;
    let header_map = build_header_map(client, headers, user_agent, skip_default_headers)?;

    // Zero means "no timeout", at the profile and the override level alike.
    let effective_timeout = timeout.or(client.timeout()).filter(|d| !d.is_zero());
    let budget = RedirectBudget::new(max_redirects.unwrap_or_else(|| client.max_redirects()));

    debug!(method = %method, url = %url, "submitting request");

    let call = async {
        let chain = follow_redirects(client, method, url, header_map, body, budget);
        match effective_timeout {
            Some(limit) => tokio::time::timeout(limit, chain)
                .await
                .map_err(|_| HttpError::Timeout(limit))?,
            None => chain.await,
        }
    };

    match cancel {
        Some(handle) => {
            tokio::select! {
                _ = handle.cancelled() => Err(HttpError::Cancelled),
                outcome = call => outcome,
            }
        }
        None => call.await,
    }
}

/// Execute the call, following redirects one hop at a time against the
/// call-scoped budget. The transport is expected not to follow redirects on
/// its own.
async fn follow_redirects(
    client: &HttpClient,
    mut method: Method,
    mut url: Url,
    headers: HeaderMap,
    mut body: Vec<u8>,
    mut budget: RedirectBudget,
) -> Result<HttpResponse, HttpError> {
    loop {
        let mut builder = client
            .transport()
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if !body.is_empty() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !is_redirect(status) {
            return HttpResponse::from_raw(response).await;
        }

        // A redirect status without a Location is a final response.
        let Some(location) = response.headers().get(header::LOCATION) else {
            return HttpResponse::from_raw(response).await;
        };
        budget.spend()?;

        let location = location.to_str().unwrap_or_default();
        let next = url.join(location).map_err(|source| HttpError::InvalidUrl {
            url: location.to_string(),
            source,
        })?;
        trace!(%status, location = %next, remaining = budget.remaining, "following redirect");

        if downgrades_to_get(status, &method) {
            method = Method::GET;
            body.clear();
        }
        url = next;
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// 303 always becomes a GET; 301/302 become GET for everything except
/// GET/HEAD. 307/308 preserve method and body.
fn downgrades_to_get(status: StatusCode, method: &Method) -> bool {
    match status {
        StatusCode::SEE_OTHER => true,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
            *method != Method::GET && *method != Method::HEAD
        }
        _ => false,
    }
}

fn parse_method(method: &str) -> Result<Method, HttpError> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| HttpError::InvalidMethod(method.to_string()))
}

/// Resolve the effective target URL from the profile host/prefix, the stored
/// path, and the working query set.
///
/// The stored path may itself be an absolute URL, in which case it overrides
/// the profile host and prefix for this call only; its own query pairs merge
/// additively into the working set before the profile defaults do.
fn resolve_target(
    client: &HttpClient,
    raw_path: &str,
    mut queries: MultiMap,
    skip_default_queries: bool,
) -> Result<Url, HttpError> {
    let mut host = client.host();
    let mut prefix = client.url_prefix();
    let mut path_part = String::new();

    if !raw_path.is_empty() {
        let trimmed = raw_path.strip_prefix('/').unwrap_or(raw_path);
        let reference = parse_reference(raw_path, trimmed)?;

        if reference.has_host() {
            // Non-special schemes have an opaque origin that serializes to
            // "null"; only an http(s)-style authority can stand in for the
            // profile host.
            match reference.origin() {
                origin @ url::Origin::Tuple(..) => {
                    host = origin.ascii_serialization();
                    prefix.clear();
                }
                url::Origin::Opaque(_) => {
                    return Err(HttpError::MalformedPath {
                        path: raw_path.to_string(),
                        reason: format!("unsupported scheme '{}'", reference.scheme()),
                    });
                }
            }
        }
        for (key, value) in reference.query_pairs() {
            queries.append(key.into_owned(), value.into_owned());
        }
        path_part = single_slash(reference.path());
    }

    if !skip_default_queries {
        queries.extend(client.default_queries());
    }

    if host.is_empty() {
        return Err(HttpError::ConfigurationMissing);
    }

    let base = format!("{host}{prefix}{path_part}");
    let mut url = Url::parse(&base).map_err(|source| HttpError::InvalidUrl { url: base, source })?;
    if !queries.is_empty() {
        let mut encoder = url.query_pairs_mut();
        for (key, value) in queries.iter() {
            encoder.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Parse `trimmed` as a URL reference: absolute URLs stand on their own,
/// everything else resolves against a placeholder base so the path and query
/// portions come back normalized.
fn parse_reference(raw_path: &str, trimmed: &str) -> Result<Url, HttpError> {
    match Url::parse(trimmed) {
        Ok(reference) => Ok(reference),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://reference.invalid/")
                .expect("placeholder base URL is valid");
            base.join(trimmed).map_err(|e| HttpError::MalformedPath {
                path: raw_path.to_string(),
                reason: e.to_string(),
            })
        }
        Err(e) => Err(HttpError::MalformedPath {
            path: raw_path.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Re-prefix a path portion with exactly one leading slash.
fn single_slash(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Merge the user-agent resolution and the profile's default headers into the
/// per-call header set, then convert to a transport header map. Merging is
/// additive: repeated names keep every value.
fn build_header_map(
    client: &HttpClient,
    mut headers: MultiMap,
    user_agent: Option<String>,
    skip_default_headers: bool,
) -> Result<HeaderMap, HttpError> {
    match user_agent {
        Some(ua) => headers.append("User-Agent", ua),
        None => {
            if let Some(ua) = client.user_agent() {
                if !ua.is_empty() {
                    headers.append("User-Agent", ua);
                }
            }
        }
    }

    if !skip_default_headers {
        headers.extend(client.default_headers());
    }

    let mut map = HeaderMap::new();
    for (key, value) in headers.iter() {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| HttpError::InvalidHeader(format!("{key}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HttpError::InvalidHeader(format!("{key}: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}
