//! Error types for the terminal front end.

use arena_viewer::{ConfigError, ViewerError};

/// Errors that can occur while running the terminal viewer.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The viewer core rejected an operation.
    #[error("viewer error: {0}")]
    Viewer(#[from] ViewerError),

    /// Reading input or drawing failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operator command could not be understood.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
