//! Baked-in defaults for the convenience client profile.

use std::time::Duration;

/// Default redirect budget for a profile.
pub const MAX_REDIRECTS: u32 = 10;

/// Default request timeout for a profile.
pub const TIMEOUT: Duration = Duration::from_secs(60);

/// Default `User-Agent` value, a fixed library identifier.
pub const USER_AGENT: &str = concat!("httpline/", env!("CARGO_PKG_VERSION"));
