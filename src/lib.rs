//! httpline
//!
//! A layered HTTP client: a reusable client profile (host, prefix, timeouts,
//! redirect budget, default headers and queries) composed with per-call
//! overrides into a single outgoing request, executed with bounded-redirect
//! semantics, and wrapped into a normalized response envelope.
//!
//! ```rust,no_run
//! use httpline::prelude::*;
//!
//! # async fn example() -> Result<(), HttpError> {
//! let api = HttpClient::for_host("https://api.example.com", "v1")?
//!     .with_default_header("X-Key", "secret");
//!
//! let response = api.request().query("active", "true").get("/users").await?;
//! if response.is_success() {
//!     let users: serde_json::Value = response.parse_json()?;
//!     println!("{users}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! One submission performs exactly one network call chain: no retries, no
//! caching, no connection-pool management beyond what the transport does.
#![deny(unsafe_code)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
mod execution;
pub mod multimap;
pub mod request;
pub mod response;

pub use cancel::CancelHandle;
pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::HttpError;
pub use multimap::MultiMap;
pub use request::HttpRequest;
pub use response::{HttpResponse, HttpResponseInfo};

/// Convenience re-exports for the common surface.
pub mod prelude {
    pub use crate::cancel::CancelHandle;
    pub use crate::client::HttpClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::HttpError;
    pub use crate::multimap::MultiMap;
    pub use crate::request::HttpRequest;
    pub use crate::response::{HttpResponse, HttpResponseInfo};
}
