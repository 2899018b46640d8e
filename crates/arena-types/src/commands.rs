//! Request bodies for the arena's REST endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /add_bot`.
///
/// `bot` names the bot module the arena should load and place on the
/// board. The arena may rename the bot to keep names unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBotRequest {
    /// Bot module name, e.g. `random_bot`.
    pub bot: String,
}

impl AddBotRequest {
    /// Create a request for the named bot.
    pub fn new(bot: impl Into<String>) -> Self {
        Self { bot: bot.into() }
    }
}
