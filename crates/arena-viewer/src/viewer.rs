//! The viewer controller.
//!
//! [`Viewer`] is the single owner of everything the display depends on:
//! the live channel, the generation counter that guards it, and the
//! [`ViewState`] (last snapshot, reconciler memory, current annotations).
//! The event loop feeds it deliveries and address changes; rendering is a
//! pure function of the state it holds.

use arena_types::Snapshot;
use tracing::{debug, info};

use crate::channel::{Delivery, DeliverySink, SnapshotChannel};
use crate::endpoint::Endpoint;
use crate::error::ViewerError;
use crate::reconcile::{Annotations, Reconciler};
use crate::render::{Grid, render};

/// What is currently on screen.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    snapshot: Snapshot,
    reconciler: Reconciler,
    annotations: Annotations,
}

impl ViewState {
    /// The pre-connection state: an empty default board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `snapshot` the displayed one.
    ///
    /// Annotations are recomputed against the previously displayed bots
    /// and replace the old ones wholesale.
    pub fn apply(&mut self, snapshot: Snapshot) -> &Annotations {
        self.annotations = self.reconciler.reconcile(&snapshot);
        self.snapshot = snapshot;
        &self.annotations
    }

    /// The displayed snapshot.
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Annotations for the current render.
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Project the state onto the board.
    pub fn grid(&self) -> Grid {
        render(&self.snapshot, &self.annotations)
    }
}

/// Owns the live connection and the displayed state.
#[derive(Debug)]
pub struct Viewer {
    endpoint: Endpoint,
    generation: u64,
    channel: Option<SnapshotChannel>,
    sink: DeliverySink,
    state: ViewState,
}

impl Viewer {
    /// A viewer for `endpoint` that pushes deliveries into `sink`.
    ///
    /// Nothing is connected until [`connect`](Self::connect) is called.
    pub fn new(endpoint: Endpoint, sink: DeliverySink) -> Self {
        Self {
            endpoint,
            generation: 0,
            channel: None,
            sink,
            state: ViewState::new(),
        }
    }

    /// Where the viewer currently points.
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Generation of the current channel. Zero before the first connect.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a channel is open and its connection task still running.
    pub fn is_connected(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|channel| !channel.is_finished())
    }

    /// The displayed state.
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Open the channel for the current endpoint, unless a live one is
    /// open. A channel whose connection already ended is replaced.
    pub fn connect(&mut self) -> Result<(), ViewerError> {
        if self.is_connected() {
            return Ok(());
        }
        let url = self.endpoint.live_url()?;
        if let Some(dead) = self.channel.take() {
            debug!(generation = dead.generation(), "replacing ended live stream");
        }
        self.generation = self.generation.wrapping_add(1);
        self.channel = Some(SnapshotChannel::open(url, self.generation, self.sink.clone()));
        Ok(())
    }

    /// Point the viewer at a new endpoint.
    ///
    /// Returns `Ok(false)` and leaves everything alone when the endpoint is
    /// unchanged and its connection is still running. Otherwise the old
    /// channel is closed, the generation advances and exactly one new
    /// channel is opened, so retargeting to the same address reconnects
    /// after a drop. An endpoint without a usable live URL is rejected
    /// before the old channel is touched.
    pub async fn retarget(&mut self, endpoint: Endpoint) -> Result<bool, ViewerError> {
        if endpoint == self.endpoint && self.is_connected() {
            debug!(%endpoint, "endpoint unchanged");
            return Ok(false);
        }
        let url = endpoint.live_url()?;

        if let Some(old) = self.channel.take() {
            old.close().await;
        }
        info!(from = %self.endpoint, to = %endpoint, "retargeting viewer");
        self.endpoint = endpoint;
        self.generation = self.generation.wrapping_add(1);
        self.channel = Some(SnapshotChannel::open(url, self.generation, self.sink.clone()));
        Ok(true)
    }

    /// Apply a delivery from the live stream.
    ///
    /// Deliveries from any generation but the current one come from a
    /// replaced channel and are dropped. Returns whether the display changed.
    pub fn apply(&mut self, delivery: Delivery) -> bool {
        if delivery.generation != self.generation || self.channel.is_none() {
            debug!(
                stale = delivery.generation,
                current = self.generation,
                "dropping delivery from replaced channel"
            );
            return false;
        }
        let round = delivery.snapshot.round;
        let annotations = self.state.apply(delivery.snapshot);
        debug!(
            round,
            moved = annotations.moves.len(),
            damaged = annotations.damaged.len(),
            attacking = annotations.attacking.len(),
            "snapshot applied"
        );
        true
    }

    /// The board as it should be drawn now.
    pub fn grid(&self) -> Grid {
        self.state.grid()
    }

    /// Close the channel. No deliveries are accepted afterwards.
    pub async fn shutdown(mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close().await;
        }
        info!("viewer shut down");
    }
}
