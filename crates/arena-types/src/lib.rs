//! Shared type definitions for the arena viewer.
//!
//! This crate mirrors the JSON the arena server speaks. Nothing here talks
//! to the network; the types are plain data with serde derives so the
//! viewer, its tests and any tooling agree on one shape.
//!
//! # Modules
//!
//! - [`geometry`] -- Board cells and the four unit directions
//! - [`snapshot`] -- Full-state snapshots pushed over the live stream
//! - [`commands`] -- Request bodies for the arena's REST endpoints

pub mod commands;
pub mod geometry;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use commands::AddBotRequest;
pub use geometry::{Cell, Direction};
pub use snapshot::{Attack, DEFAULT_BOARD_SIZE, EntityState, MAX_BOARD_SIZE, Snapshot};
