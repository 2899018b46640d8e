//! Out-of-band commands: spawning bots and probing liveness.
//!
//! These calls never touch the display state. A successful spawn only shows
//! up once a later snapshot contains the new bot. Failures are logged and
//! handed back to the caller as values; nothing is retried.

use arena_types::AddBotRequest;
use tracing::{debug, warn};

use crate::endpoint::{ADD_BOT_PATH, Endpoint, HEALTH_PATH};
use crate::error::ViewerError;

/// Result of a liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// The arena answered with a 2xx status.
    Ok,
    /// The arena was unreachable or answered with anything else.
    Error,
}

impl ApiStatus {
    /// Lowercase label shown to the operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

impl core::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP client for the arena's REST endpoints.
#[derive(Debug, Clone)]
pub struct ArenaClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl ArenaClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// The endpoint requests go to.
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Ask the arena to load and place the named bot.
    ///
    /// Any 2xx response counts as success. A blank name is rejected
    /// without contacting the arena.
    pub async fn spawn_bot(&self, name: &str) -> Result<(), ViewerError> {
        if name.trim().is_empty() {
            warn!("refusing to spawn a bot without a name");
            return Err(ViewerError::Control(String::from("bot name is empty")));
        }

        let url = self.endpoint.api_url(ADD_BOT_PATH)?;
        let response = self
            .client
            .post(url)
            .json(&AddBotRequest::new(name))
            .send()
            .await
            .map_err(|e| {
                warn!(bot = name, error = %e, "add bot request failed");
                ViewerError::Control(format!("add bot request failed: {e}"))
            })?;

        let status = response.status();
        debug!(bot = name, %status, "add bot response");
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            warn!(bot = name, %status, body, "arena rejected bot");
            return Err(ViewerError::Control(format!(
                "arena returned {status}: {body}"
            )));
        }
        Ok(())
    }

    /// Probe `GET /health`.
    pub async fn check_health(&self) -> ApiStatus {
        let url = match self.endpoint.api_url(HEALTH_PATH) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "health check skipped");
                return ApiStatus::Error;
            }
        };

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(%status, "health check");
                if status.is_success() {
                    ApiStatus::Ok
                } else {
                    ApiStatus::Error
                }
            }
            Err(e) => {
                warn!(error = %e, "health check failed");
                ApiStatus::Error
            }
        }
    }
}
