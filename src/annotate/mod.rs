//! Annotation state machine.
//!
//! [`Annotator`] owns the line buffer, the mark store, the interaction mode
//! and the viewport. It is driven one event at a time by the event loop and
//! never blocks on tmux: captures come back as [`Effect::Capture`] for the
//! loop to run on a worker, and their results are applied later through
//! [`Annotator::complete_capture`].
//!
//! ## Module layout
//!
//! - [`types`]: mode, effect and settings types
//! - [`viewport`]: cursor and scroll offset
//! - `browse`: Browse-mode commands
//! - `entry`: note entry, range count entry and full-scrollback confirmation
//! - `bridge`: requests arriving over the command bridge

mod bridge;
mod browse;
mod entry;
pub mod types;
pub mod viewport;

pub use types::{AnnotatorSettings, CaptureJob, Effect, Mode, OverlayKind, PanelSplit};
pub use viewport::Viewport;

use crate::buffer::LineBuffer;
use crate::delivery::Delivery;
use crate::keys::Key;
use crate::marks::MarkStore;
use clipnote_bridge::{BridgeCommand, BridgeResponse, CaptureSummary};
use clipnote_capture::{CaptureOutcome, failure_message};

pub struct Annotator {
    buffer: LineBuffer,
    marks: MarkStore,
    mode: Mode,
    viewport: Viewport,
    split: PanelSplit,
    note_char_limit: usize,
    /// Transient feedback shown on the status line.
    status: String,
    delivery: Box<dyn Delivery>,
}

impl Annotator {
    pub fn new(settings: AnnotatorSettings, delivery: Box<dyn Delivery>) -> Self {
        Self {
            buffer: LineBuffer::new(),
            marks: MarkStore::new(settings.snapshot_width),
            mode: Mode::Browse,
            viewport: Viewport::default(),
            split: settings.split,
            note_char_limit: settings.note_char_limit,
            status: String::new(),
            delivery,
        }
    }

    // ========================================================================
    // Read access for rendering and tests
    // ========================================================================

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn marks(&self) -> &MarkStore {
        &self.marks
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn cursor(&self) -> usize {
        self.viewport.cursor()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn split_ratio(&self) -> u16 {
        self.split.ratio()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn note_char_limit(&self) -> usize {
        self.note_char_limit
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Apply one key press in the current mode.
    pub fn handle_key(&mut self, key: Key) -> Effect {
        match self.mode {
            Mode::Overlay(_) => {
                self.mode = Mode::Browse;
                Effect::None
            }
            Mode::FullScrollbackConfirm => self.handle_confirm_key(key),
            Mode::RangeCountEntry { .. } => self.handle_range_key(key),
            Mode::NoteEntry { .. } => self.handle_note_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    /// The terminal was resized to `rows` rows.
    pub fn handle_resize(&mut self, rows: u16) {
        self.viewport.set_terminal_height(rows);
    }

    /// Apply a finished capture, then answer the bridge request that asked
    /// for it, if any.
    pub fn complete_capture(&mut self, outcome: CaptureOutcome, reply: Option<BridgeCommand>) {
        let response = match outcome {
            CaptureOutcome::Captured(text) => {
                let appended = self.buffer.append_capture(&text);
                self.viewport.move_to(appended.first_line);
                self.status = format!(
                    "Captured {} lines (total {})",
                    appended.lines_captured,
                    self.buffer.len()
                );
                log::info!("{}", self.status);
                BridgeResponse::result(&CaptureSummary {
                    lines_captured: appended.lines_captured,
                    total_lines: self.buffer.len(),
                })
            }
            CaptureOutcome::Failed(message) => {
                self.status = failure_message(&message);
                BridgeResponse::error(format!("capture failed: {message}"))
            }
        };

        if let Some(command) = reply {
            command.respond(response);
        }
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    fn current_line_text(&self) -> Option<&str> {
        self.buffer.line(self.viewport.cursor())
    }

    /// Copy the export text to the clipboard and describe the result.
    fn copy_marks_to_clipboard(&mut self) -> String {
        let text = self.marks.export_text();
        if text.is_empty() {
            return "No marks to export".to_string();
        }
        match self.delivery.copy_to_clipboard(&text) {
            Ok(()) => format!("Copied {} marks to clipboard", self.marks.len()),
            Err(e) => {
                log::warn!("clipboard write failed: {e}");
                format!("Clipboard write failed: {e}")
            }
        }
    }
}
