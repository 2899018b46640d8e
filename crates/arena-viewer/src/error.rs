//! Error types for the arena viewer.
//!
//! [`ViewerError`] unifies the failure modes of the viewer library. None of
//! them is fatal: the live path turns them into log lines and a frozen
//! display, the command path turns them into a status the operator sees.

/// Errors that can occur in the viewer.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The configured base address does not yield a usable URL.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    /// The live connection could not be established or broke.
    #[error("transport error: {0}")]
    Transport(String),

    /// A spawn command or health probe failed.
    #[error("command failed: {0}")]
    Control(String),

    /// A payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

