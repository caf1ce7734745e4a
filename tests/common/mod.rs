//! Shared integration test helpers for clipnote.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` below silences warnings for helpers a given file
//! does not use.

#![allow(dead_code)]

use clipnote::annotate::{Annotator, AnnotatorSettings};
use clipnote::delivery::{Delivery, DeliveryError};
use clipnote::event_loop::{self, AppEvent, EventLoop};
use clipnote_capture::{CaptureEngine, CaptureError, CaptureRange, PaneCollaborator};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Pane id used by every helper.
pub const PANE: &str = "%1";

/// A pane that answers captures from a script and records what it was asked.
#[derive(Default)]
pub struct ScriptedPane {
    pub text: Mutex<String>,
    pub scroll_position: Mutex<String>,
    pub pane_height: Mutex<String>,
    pub fail_with: Mutex<Option<String>>,
    pub ranges: Mutex<Vec<CaptureRange>>,
    pub buffer: Mutex<Option<String>>,
    pub pasted: Mutex<Vec<String>>,
    pub set_buffer_error: Mutex<Option<String>>,
    pub paste_error: Mutex<Option<String>>,
}

impl ScriptedPane {
    pub fn with_text(text: &str) -> Arc<Self> {
        let pane = Self::default();
        *pane.text.lock().unwrap() = text.to_string();
        *pane.scroll_position.lock().unwrap() = "0".to_string();
        *pane.pane_height.lock().unwrap() = "24".to_string();
        Arc::new(pane)
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn fail(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn ranges(&self) -> Vec<CaptureRange> {
        self.ranges.lock().unwrap().clone()
    }
}

impl PaneCollaborator for ScriptedPane {
    fn display_var(&self, _pane: &str, name: &str) -> Result<String, CaptureError> {
        match name {
            "scroll_position" => Ok(self.scroll_position.lock().unwrap().clone()),
            "pane_height" => Ok(self.pane_height.lock().unwrap().clone()),
            other => Err(CaptureError::CommandFailed(format!("unknown variable {other}"))),
        }
    }

    fn capture_pane(&self, _pane: &str, range: &CaptureRange) -> Result<String, CaptureError> {
        self.ranges.lock().unwrap().push(*range);
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(CaptureError::CommandFailed(message));
        }
        Ok(format!("{}\n", self.text.lock().unwrap()))
    }

    fn set_buffer(&self, text: &str) -> Result<(), CaptureError> {
        if let Some(message) = self.set_buffer_error.lock().unwrap().clone() {
            return Err(CaptureError::CommandFailed(message));
        }
        *self.buffer.lock().unwrap() = Some(text.to_string());
        Ok(())
    }

    fn paste_buffer(&self, pane: &str) -> Result<(), CaptureError> {
        if let Some(message) = self.paste_error.lock().unwrap().clone() {
            return Err(CaptureError::CommandFailed(message));
        }
        let text = self.buffer.lock().unwrap().clone().unwrap_or_default();
        self.pasted.lock().unwrap().push(format!("{pane}:{text}"));
        Ok(())
    }
}

/// Delivery that keeps everything it was handed.
#[derive(Clone, Default)]
pub struct RecordingDelivery {
    pub copied: Arc<Mutex<Vec<String>>>,
    pub pasted: Arc<Mutex<Vec<String>>>,
}

impl Delivery for RecordingDelivery {
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliveryError> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn paste_to_pane(&mut self, text: &str) -> Result<(), DeliveryError> {
        self.pasted.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// An annotator with default settings and a 24-row terminal.
pub fn annotator(delivery: RecordingDelivery) -> Annotator {
    let mut annotator = Annotator::new(AnnotatorSettings::default(), Box::new(delivery));
    annotator.handle_resize(24);
    annotator
}

/// An event loop over `pane`, plus the sender producers use.
pub fn event_loop(
    pane: Arc<ScriptedPane>,
    delivery: RecordingDelivery,
) -> (EventLoop, mpsc::Sender<AppEvent>) {
    let (tx, rx) = event_loop::channel(64);
    let engine = CaptureEngine::new(pane, PANE);
    let lp = EventLoop::new(
        annotator(delivery),
        engine,
        rx,
        tx.clone(),
        Some(Duration::from_secs(5)),
    );
    (lp, tx)
}
