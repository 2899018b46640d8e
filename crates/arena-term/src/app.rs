//! The terminal event loop.
//!
//! [`App`] pairs a [`Session`] with the screen. One loop multiplexes four
//! sources:
//!
//! - snapshot deliveries from the live channel
//! - operator lines from stdin
//! - results of spawn and health requests running on their own tasks
//! - Ctrl-C
//!
//! Every change goes through the session; the loop only redraws after it.

use std::io::{Stdout, stdout};

use arena_viewer::{DeliveryStream, Viewer, ViewerConfig, delivery_channel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::TermError;
use crate::session::{Flow, OutcomeStream, Session};
use crate::terminal::Screen;

/// The running terminal viewer.
pub struct App {
    session: Session,
    screen: Screen<Stdout>,
    deliveries: DeliveryStream,
    outcomes: OutcomeStream,
}

impl App {
    /// Build the viewer from `config`, connect it and start the first
    /// health probe.
    pub fn start(config: &ViewerConfig) -> Result<Self, TermError> {
        let (sink, deliveries) = delivery_channel();
        let (outcome_sink, outcomes) = mpsc::unbounded_channel();

        let mut viewer = Viewer::new(config.endpoint(), sink);
        viewer.connect()?;

        let session = Session::new(viewer, config.default_bot.clone(), outcome_sink);
        session.probe_health();

        Ok(Self {
            session,
            screen: Screen::new(stdout()),
            deliveries,
            outcomes,
        })
    }

    /// Run until the operator quits, stdin closes or Ctrl-C arrives.
    pub async fn run(mut self) -> Result<(), TermError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        self.redraw()?;

        loop {
            tokio::select! {
                Some(delivery) = self.deliveries.recv() => {
                    if self.session.deliver(delivery) {
                        self.redraw()?;
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("stdin closed");
                        break;
                    };
                    if self.session.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                    self.redraw()?;
                }
                Some(outcome) = self.outcomes.recv() => {
                    self.session.record(outcome);
                    self.redraw()?;
                }
                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        warn!(error = %e, "failed to listen for Ctrl-C");
                    }
                    info!("interrupted");
                    break;
                }
            }
        }

        self.session.shutdown().await;
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), TermError> {
        let grid = self.session.grid();
        self.screen.draw(&grid, self.session.status())?;
        Ok(())
    }
}
