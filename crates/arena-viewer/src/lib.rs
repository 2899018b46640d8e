//! Live observer client for the arena.
//!
//! The arena pushes a full board snapshot every round over a WebSocket.
//! This crate turns that stream into something drawable:
//!
//! - **Live channel** ([`channel`]) holds one connection to `/ws` and
//!   forwards parsed snapshots tagged with a generation number
//! - **Reconciler** ([`reconcile`]) diffs consecutive snapshots by bot name
//!   to find moves, damage and attacks the arena never reports directly
//! - **Renderer** ([`render`]) projects a snapshot plus its annotations onto
//!   the board grid, colored per bot by [`color`]
//! - **Controller** ([`viewer`]) owns the channel and the displayed state,
//!   switching connections when the target address changes
//! - **Control surface** ([`control`]) spawns bots and probes liveness,
//!   independent of the stream
//!
//! # Architecture
//!
//! ```text
//! arena /ws --> SnapshotChannel --> Viewer::apply --> Reconciler --> render --> Grid
//!                                                                      ^
//!                                                            color_of -+
//! ```
//!
//! Nothing here is fatal. Malformed frames and dropped connections leave
//! the last board on screen; failed commands come back as status values.

pub mod channel;
pub mod color;
pub mod config;
pub mod control;
pub mod endpoint;
pub mod error;
pub mod reconcile;
pub mod render;
pub mod viewer;

// Re-export primary types for convenience.
pub use channel::{Delivery, DeliverySink, DeliveryStream, SnapshotChannel, delivery_channel};
pub use color::{Hsl, Rgb, color_of};
pub use config::{ConfigError, ViewerConfig};
pub use control::{ApiStatus, ArenaClient};
pub use endpoint::{Endpoint, PageOrigin};
pub use error::ViewerError;
pub use reconcile::{Annotations, Reconciler, diff};
pub use render::{ArrowMarker, CellView, EntityMarker, Grid, render};
pub use viewer::{ViewState, Viewer};
