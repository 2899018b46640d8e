//! The live snapshot stream.
//!
//! A [`SnapshotChannel`] owns one WebSocket connection to the arena's
//! `/ws` endpoint, driven by a background Tokio task. Every text frame is
//! parsed as a [`Snapshot`] and forwarded, in arrival order, as a
//! [`Delivery`] tagged with the channel's generation. The viewer compares
//! that tag with its current generation before applying anything, so a
//! channel that has been replaced can never write into the new context.
//!
//! Frames that do not parse are logged and dropped. A failed connect or a
//! dropped connection ends the task; there is no automatic retry.

use arena_types::Snapshot;
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ViewerError;

/// One snapshot received on a specific channel generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Generation of the channel that received the snapshot.
    pub generation: u64,
    /// The parsed snapshot.
    pub snapshot: Snapshot,
}

/// Sending half the channel pushes deliveries into.
pub type DeliverySink = mpsc::UnboundedSender<Delivery>;

/// Receiving half the event loop drains.
pub type DeliveryStream = mpsc::UnboundedReceiver<Delivery>;

/// Create a connected sink/stream pair for deliveries.
pub fn delivery_channel() -> (DeliverySink, DeliveryStream) {
    mpsc::unbounded_channel()
}

/// Handle to a running live connection.
///
/// Closing consumes the handle, so a channel is closed at most once.
/// Dropping the handle without calling [`close`](Self::close) also stops
/// the task, it just does not wait for it.
#[derive(Debug)]
pub struct SnapshotChannel {
    generation: u64,
    url: Url,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SnapshotChannel {
    /// Start connecting to `url` in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(url: Url, generation: u64, sink: DeliverySink) -> Self {
        let (shutdown, stop) = oneshot::channel();
        info!(%url, generation, "opening live stream");
        let task = tokio::spawn(run(url.clone(), generation, sink, stop));
        Self {
            generation,
            url,
            shutdown,
            task,
        }
    }

    /// Generation this channel tags its deliveries with.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Address this channel connects to.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the connection task has ended, on request or because the
    /// connect failed or the arena hung up.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the connection and wait for the task to finish.
    ///
    /// Once this returns the channel produces no further deliveries.
    pub async fn close(self) {
        // The task may already have ended on its own (connect failure,
        // server hangup); then nobody is listening and that is fine.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!(generation = self.generation, error = %e, "live stream task failed");
        }
        debug!(url = %self.url, generation = self.generation, "live stream closed");
    }
}

/// Connection task: connect, pump frames into `sink`, stop on request.
async fn run(url: Url, generation: u64, sink: DeliverySink, mut stop: oneshot::Receiver<()>) {
    let connected = tokio::select! {
        _ = &mut stop => {
            debug!(generation, "live stream stopped before connecting");
            return;
        }
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
    };

    let mut socket = match connected {
        Ok((socket, _response)) => socket,
        Err(e) => {
            let error = ViewerError::Transport(e.to_string());
            warn!(%url, generation, %error, "live stream connect failed");
            return;
        }
    };
    info!(%url, generation, "live stream connected");

    loop {
        tokio::select! {
            _ = &mut stop => {
                if let Err(e) = socket.close(None).await {
                    debug!(generation, error = %e, "close handshake failed");
                }
                return;
            }
            message = socket.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => match Snapshot::from_json(text.as_str()) {
                        Ok(snapshot) => {
                            debug!(generation, round = snapshot.round, "snapshot received");
                            if sink.send(Delivery { generation, snapshot }).is_err() {
                                debug!(generation, "viewer gone, dropping live stream");
                                return;
                            }
                        }
                        Err(e) => {
                            let error = ViewerError::from(e);
                            warn!(generation, %error, "discarding malformed snapshot");
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        info!(generation, ?frame, "arena closed the live stream");
                        return;
                    }
                    Some(Ok(_)) => {
                        // Binary frames carry nothing for us; ping/pong is
                        // answered by tungstenite itself.
                    }
                    Some(Err(e)) => {
                        let error = ViewerError::Transport(e.to_string());
                        warn!(generation, %error, "live stream failed");
                        return;
                    }
                    None => {
                        info!(generation, "live stream ended");
                        return;
                    }
                }
            }
        }
    }
}
