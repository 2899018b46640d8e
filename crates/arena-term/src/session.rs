//! Operator session state.
//!
//! [`Session`] holds everything the terminal shows besides the board
//! itself and applies every state transition: live deliveries, operator
//! commands and the results of spawn and health requests. It never reads
//! stdin or writes the screen, so the event loop in [`crate::app`] stays a
//! thin multiplexer.

use arena_viewer::{ApiStatus, ArenaClient, Delivery, Endpoint, Grid, Viewer, ViewerError};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::command::{Command, USAGE};
use crate::terminal::StatusLine;

/// Result of a request that ran off the event loop.
#[derive(Debug)]
pub enum ControlOutcome {
    /// Liveness probe finished. Tagged with the viewer generation it was
    /// issued under so a probe of a replaced endpoint is ignored.
    Health {
        /// Viewer generation when the probe was sent.
        generation: u64,
        /// What the arena answered.
        status: ApiStatus,
    },
    /// Spawn request finished.
    Spawn {
        /// Requested bot.
        name: String,
        /// Outcome.
        result: Result<(), ViewerError>,
    },
}

/// Sending half for control results.
pub type OutcomeSink = mpsc::UnboundedSender<ControlOutcome>;

/// Receiving half the event loop drains.
pub type OutcomeStream = mpsc::UnboundedReceiver<ControlOutcome>;

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Shut down.
    Quit,
}

/// Viewer, command client and status line of one terminal run.
#[derive(Debug)]
pub struct Session {
    viewer: Viewer,
    client: ArenaClient,
    default_bot: String,
    status: StatusLine,
    outcomes: OutcomeSink,
}

impl Session {
    /// Wrap a viewer. Spawn and health results are sent to `outcomes`.
    pub fn new(viewer: Viewer, default_bot: String, outcomes: OutcomeSink) -> Self {
        let endpoint = viewer.endpoint().clone();
        Self {
            client: ArenaClient::new(endpoint.clone()),
            status: StatusLine {
                target: endpoint.to_string(),
                ..StatusLine::default()
            },
            viewer,
            default_bot,
            outcomes,
        }
    }

    /// The viewer.
    #[cfg(test)]
    pub const fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// The status line as it should be drawn.
    pub const fn status(&self) -> &StatusLine {
        &self.status
    }

    /// The board as it should be drawn.
    pub fn grid(&self) -> Grid {
        self.viewer.grid()
    }

    /// Apply a live delivery. Returns whether the board changed.
    pub fn deliver(&mut self, delivery: Delivery) -> bool {
        self.viewer.apply(delivery)
    }

    /// Parse and run one operator line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle(command).await,
            Ok(None) => Flow::Continue,
            Err(e) => {
                self.status.message = format!("{e}. {USAGE}");
                Flow::Continue
            }
        }
    }

    /// Run one operator command.
    pub async fn handle(&mut self, command: Command) -> Flow {
        debug!(?command, "operator command");
        match command {
            Command::Add(name) => {
                let name = name.unwrap_or_else(|| self.default_bot.clone());
                self.status.message = format!("spawning {name}");
                self.spawn_bot(name);
            }
            Command::Health => {
                self.status.message = String::from("checking health");
                self.probe_health();
            }
            Command::Connect(base) => {
                let endpoint = self.viewer.endpoint().with_base(base.as_deref());
                self.retarget(endpoint).await;
            }
            Command::Help => self.status.message = String::from(USAGE),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    async fn retarget(&mut self, endpoint: Endpoint) {
        match self.viewer.retarget(endpoint).await {
            Ok(true) => {
                let endpoint = self.viewer.endpoint().clone();
                self.status.target = endpoint.to_string();
                self.status.api = None;
                self.status.message = format!("connected to {endpoint}");
                self.client = ArenaClient::new(endpoint);
                self.probe_health();
            }
            Ok(false) => self.status.message = String::from("already connected"),
            Err(e) => {
                warn!(error = %e, "retarget rejected");
                self.status.message = format!("connect failed: {e}");
            }
        }
    }

    fn spawn_bot(&self, name: String) {
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = client.spawn_bot(&name).await;
            let _ = outcomes.send(ControlOutcome::Spawn { name, result });
        });
    }

    /// Probe the current endpoint in the background.
    pub fn probe_health(&self) {
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        let generation = self.viewer.generation();
        tokio::spawn(async move {
            let status = client.check_health().await;
            let _ = outcomes.send(ControlOutcome::Health { generation, status });
        });
    }

    /// Fold a finished request into the status line.
    pub fn record(&mut self, outcome: ControlOutcome) {
        match outcome {
            ControlOutcome::Health { generation, status } => {
                if generation == self.viewer.generation() {
                    self.status.api = Some(status);
                } else {
                    debug!(generation, "ignoring health result for replaced endpoint");
                }
            }
            ControlOutcome::Spawn { name, result } => {
                self.status.message = match result {
                    Ok(()) => format!("spawned {name}"),
                    Err(e) => format!("spawn {name} failed: {e}"),
                };
            }
        }
    }

    /// Close the live stream.
    pub async fn shutdown(self) {
        self.viewer.shutdown().await;
    }
}
