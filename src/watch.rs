//! `clipnote watch`: run the annotation panel for one pane.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clipnote_bridge::{EventSlot, start_server};
use clipnote_capture::{CaptureEngine, PaneCollaborator, TmuxPane};
use clipnote_config::Config;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::annotate::{Annotator, AnnotatorSettings};
use crate::delivery::SystemDelivery;
use crate::event_loop::{self, AppEvent, EventLoop};
use crate::tui::{self, Tui};

pub fn run(pane: String, config: &Config, socket: PathBuf) -> Result<()> {
    let runtime = Runtime::new().context("failed to create tokio runtime")?;
    let result = runtime.block_on(run_panel(pane, config, socket));

    // A capture stuck in tmux would otherwise hold shutdown forever.
    runtime.shutdown_timeout(Duration::from_secs(2));
    result
}

async fn run_panel(pane: String, config: &Config, socket: PathBuf) -> Result<()> {
    log::info!("watching pane {pane}");

    let slot = Arc::new(EventSlot::<AppEvent>::new());
    let cancel = CancellationToken::new();
    let server = match start_server(socket, slot.clone(), cancel.clone()).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("command bridge disabled: {e}");
            None
        }
    };

    let collaborator: Arc<dyn PaneCollaborator> = Arc::new(TmuxPane::new(&config.tmux_path));
    let engine = CaptureEngine::new(collaborator.clone(), pane.clone());
    let delivery = SystemDelivery::new(collaborator, pane);
    let mut annotator = Annotator::new(AnnotatorSettings::from_config(config), Box::new(delivery));

    let mut tui = Tui::init().context("failed to initialize terminal")?;
    annotator.handle_resize(tui.rows()?);

    let (tx, rx) = event_loop::channel(config.event_queue_capacity);
    tui::spawn_input_thread(tx.clone()).context("failed to start input thread")?;
    slot.install(tx.clone());

    let result = EventLoop::new(annotator, engine, rx, tx, config.capture_timeout())
        .run(|annotator| Ok(tui.draw(annotator)?))
        .await;

    cancel.cancel();
    if let Some(server) = server {
        let _ = server.await;
    }
    drop(tui);

    result.map(|_| ())
}
