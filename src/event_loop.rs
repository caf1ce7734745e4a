//! The single-consumer event loop.
//!
//! Key presses, terminal resizes, capture results and bridge requests all
//! arrive on one bounded queue. The loop applies them one at a time to the
//! [`Annotator`], which is touched by nothing else. Captures run on the
//! blocking pool and report back through the same queue.

use std::ops::ControlFlow;
use std::time::Duration;

use clipnote_bridge::BridgeCommand;
use clipnote_capture::{CaptureEngine, CaptureError, CaptureOutcome};
use tokio::sync::mpsc;

use crate::annotate::{Annotator, CaptureJob, Effect};
use crate::keys::Key;

/// Everything the annotation loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Key(Key),
    Resize { rows: u16 },
    CaptureCompleted {
        outcome: CaptureOutcome,
        reply: Option<BridgeCommand>,
    },
    Bridge(BridgeCommand),
}

impl From<BridgeCommand> for AppEvent {
    fn from(command: BridgeCommand) -> Self {
        AppEvent::Bridge(command)
    }
}

/// Create the loop's bounded queue.
pub fn channel(capacity: usize) -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    mpsc::channel(capacity.max(1))
}

pub struct EventLoop {
    annotator: Annotator,
    engine: CaptureEngine,
    events: mpsc::Receiver<AppEvent>,
    /// Handed to capture workers so they can report back.
    worker_tx: mpsc::Sender<AppEvent>,
    capture_timeout: Option<Duration>,
}

impl EventLoop {
    pub fn new(
        annotator: Annotator,
        engine: CaptureEngine,
        events: mpsc::Receiver<AppEvent>,
        worker_tx: mpsc::Sender<AppEvent>,
        capture_timeout: Option<Duration>,
    ) -> Self {
        Self {
            annotator,
            engine,
            events,
            worker_tx,
            capture_timeout,
        }
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Process events until the user quits.
    ///
    /// `render` is called once up front and after every event.
    pub async fn run<F>(mut self, mut render: F) -> anyhow::Result<Annotator>
    where
        F: FnMut(&Annotator) -> anyhow::Result<()>,
    {
        render(&self.annotator)?;
        while let Some(event) = self.events.recv().await {
            if self.handle_event(event).is_break() {
                log::info!("annotation loop quitting");
                break;
            }
            render(&self.annotator)?;
        }
        Ok(self.annotator)
    }

    /// Wait for the next event and apply it.
    ///
    /// Returns `None` when the queue is closed.
    pub async fn step(&mut self) -> Option<ControlFlow<()>> {
        let event = self.events.recv().await?;
        Some(self.handle_event(event))
    }

    /// Apply one event.
    pub fn handle_event(&mut self, event: AppEvent) -> ControlFlow<()> {
        let effect = match event {
            AppEvent::Key(key) => self.annotator.handle_key(key),
            AppEvent::Resize { rows } => {
                self.annotator.handle_resize(rows);
                Effect::None
            }
            AppEvent::CaptureCompleted { outcome, reply } => {
                self.annotator.complete_capture(outcome, reply);
                Effect::None
            }
            AppEvent::Bridge(command) => self.annotator.handle_bridge(command),
        };

        match effect {
            Effect::None => ControlFlow::Continue(()),
            Effect::Capture(job) => {
                self.spawn_capture(job);
                ControlFlow::Continue(())
            }
            Effect::Quit => ControlFlow::Break(()),
        }
    }

    /// Run a capture on the blocking pool and queue its result.
    fn spawn_capture(&self, job: CaptureJob) {
        let engine = self.engine.clone();
        let tx = self.worker_tx.clone();
        let timeout = self.capture_timeout;
        let CaptureJob { intent, reply } = job;

        tokio::spawn(async move {
            let worker = tokio::task::spawn_blocking(move || engine.capture(intent));
            let joined = match timeout {
                Some(limit) => match tokio::time::timeout(limit, worker).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        log::warn!("capture timed out after {}s", limit.as_secs());
                        Ok(CaptureOutcome::failed(&CaptureError::TimedOut(
                            limit.as_secs(),
                        )))
                    }
                },
                None => worker.await,
            };
            let outcome = joined.unwrap_or_else(|e| {
                log::error!("capture worker failed: {e}");
                CaptureOutcome::Failed(format!("capture worker failed: {e}"))
            });

            if tx
                .send(AppEvent::CaptureCompleted { outcome, reply })
                .await
                .is_err()
            {
                log::debug!("annotation loop gone before capture completed");
            }
        });
    }
}
