//! Terminal front end for the arena viewer.
//!
//! Connects to the arena's live stream, draws the board in the terminal
//! after every accepted snapshot and reads operator commands from stdin.
//!
//! # Architecture
//!
//! ```text
//! arena /ws --> Viewer --> Grid --> Screen (stdout)
//! stdin ------> Command --> ArenaClient (add_bot, health) --> status line
//! ```
//!
//! Logs go to stderr so they never interleave with the board; redirect
//! them with `2>arena.log` and tune them with `RUST_LOG`.

mod app;
mod command;
mod error;
mod session;
mod terminal;

use std::path::PathBuf;

use arena_viewer::ViewerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::error::TermError;

/// Config file read when `ARENA_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "arena-config.yaml";

/// Application entry point.
///
/// Initializes logging, loads configuration, connects the viewer and runs
/// the event loop until the operator quits.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the terminal
/// cannot be read or written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("arena-term starting");

    let config = load_config()?;
    info!(
        endpoint = %config.endpoint(),
        default_bot = config.default_bot,
        "configuration loaded"
    );

    let app = App::start(&config)?;
    app.run().await?;

    info!("arena-term stopped");
    Ok(())
}

/// Load configuration from `ARENA_CONFIG`, or the default file when it
/// exists, or the environment alone.
fn load_config() -> Result<ViewerConfig, TermError> {
    let config = match std::env::var_os("ARENA_CONFIG") {
        Some(path) => ViewerConfig::from_file(&PathBuf::from(path))?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                ViewerConfig::from_file(&path)?
            } else {
                ViewerConfig::from_env()?
            }
        }
    };
    Ok(config)
}
