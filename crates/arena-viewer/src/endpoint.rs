//! Address derivation for the live stream and the REST endpoints.
//!
//! The viewer is configured with one optional base address. When it is set,
//! every URL hangs off it: the live stream swaps the `http` scheme prefix
//! for `ws` (so `https` becomes `wss`) and appends `/ws`. When it is unset
//! the viewer falls back to the origin it is served from, picking `wss` or
//! `ws` by whether that origin is secure.

use serde::Deserialize;
use url::Url;

use crate::error::ViewerError;

/// Path of the live snapshot stream.
pub const LIVE_PATH: &str = "/ws";

/// Path of the spawn command.
pub const ADD_BOT_PATH: &str = "/add_bot";

/// Path of the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// The origin used when no base address is configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageOrigin {
    /// Host and optional port, e.g. `localhost:8000`.
    #[serde(default = "default_host")]
    pub host: String,
    /// Whether the origin is served over TLS.
    #[serde(default)]
    pub secure: bool,
}

fn default_host() -> String {
    String::from("localhost:8000")
}

impl Default for PageOrigin {
    fn default() -> Self {
        Self {
            host: default_host(),
            secure: false,
        }
    }
}

/// Where the viewer talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Option<String>,
    origin: PageOrigin,
}

impl Endpoint {
    /// Build an endpoint from a raw base address and a fallback origin.
    ///
    /// Trailing slashes are trimmed so paths can be appended verbatim.
    /// A blank base counts as unset.
    pub fn new(base: Option<&str>, origin: PageOrigin) -> Self {
        Self {
            base: base.and_then(normalize_base),
            origin,
        }
    }

    /// Same origin, different base address.
    #[must_use]
    pub fn with_base(&self, base: Option<&str>) -> Self {
        Self::new(base, self.origin.clone())
    }

    /// The normalized base address, if one is configured.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// The fallback origin.
    pub const fn origin(&self) -> &PageOrigin {
        &self.origin
    }

    /// URL of the live snapshot stream.
    pub fn live_url(&self) -> Result<Url, ViewerError> {
        let raw = match &self.base {
            Some(base) => match base.strip_prefix("http") {
                Some(rest) => format!("ws{rest}{LIVE_PATH}"),
                None => format!("{base}{LIVE_PATH}"),
            },
            None => {
                let scheme = if self.origin.secure { "wss" } else { "ws" };
                format!("{scheme}://{}{LIVE_PATH}", self.origin.host)
            }
        };
        parse(&raw)
    }

    /// URL of a REST endpoint such as [`HEALTH_PATH`].
    pub fn api_url(&self, path: &str) -> Result<Url, ViewerError> {
        let raw = match &self.base {
            Some(base) => format!("{base}{path}"),
            None => {
                let scheme = if self.origin.secure { "https" } else { "http" };
                format!("{scheme}://{}{path}", self.origin.host)
            }
        };
        parse(&raw)
    }
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.base {
            Some(base) => f.write_str(base),
            None => write!(f, "origin {}", self.origin.host),
        }
    }
}

fn normalize_base(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse(raw: &str) -> Result<Url, ViewerError> {
    Url::parse(raw).map_err(|e| ViewerError::Endpoint(format!("{raw}: {e}")))
}
