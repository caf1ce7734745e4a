//! Browse-mode commands.

use super::{Annotator, Effect, Mode, OverlayKind};
use crate::delivery::DeliveryError;
use crate::keys::{BrowseAction, Key};
use clipnote_capture::CaptureIntent;

impl Annotator {
    pub(super) fn handle_browse_key(&mut self, key: Key) -> Effect {
        match BrowseAction::from_key(key) {
            Some(action) => self.apply_browse_action(action),
            None => Effect::None,
        }
    }

    pub(super) fn apply_browse_action(&mut self, action: BrowseAction) -> Effect {
        match action {
            BrowseAction::Quit => return Effect::Quit,
            BrowseAction::Up => {
                let cursor = self.viewport.cursor();
                if cursor > 0 {
                    self.viewport.move_to(cursor - 1);
                }
                self.status.clear();
            }
            BrowseAction::Down => {
                let cursor = self.viewport.cursor();
                if cursor + 1 < self.buffer.len() {
                    self.viewport.move_to(cursor + 1);
                }
                self.status.clear();
            }
            BrowseAction::Top => {
                self.viewport.reset();
                self.status.clear();
            }
            BrowseAction::Bottom => {
                self.viewport.move_to(self.buffer.len().saturating_sub(1));
                self.status.clear();
            }
            BrowseAction::ToggleMark => self.toggle_current_mark(),
            BrowseAction::Annotate => self.start_note_entry(),
            BrowseAction::CaptureVisible => return Effect::capture(CaptureIntent::Visible),
            BrowseAction::CaptureRange => {
                self.mode = Mode::RangeCountEntry {
                    buffer: String::new(),
                };
                self.status = "Enter line count (empty = full scrollback)".to_string();
            }
            BrowseAction::ClearAll => self.clear_all(),
            BrowseAction::Export => self.status = self.copy_marks_to_clipboard(),
            BrowseAction::PasteToPane => self.status = self.paste_marks_to_pane(),
            BrowseAction::ViewNote => {
                let cursor = self.viewport.cursor();
                if self.marks.note(cursor).is_some_and(|n| !n.is_empty()) {
                    self.mode = Mode::Overlay(OverlayKind::Note);
                }
            }
            BrowseAction::Help => self.mode = Mode::Overlay(OverlayKind::Help),
            BrowseAction::ShrinkPanel => self.split.shrink(),
            BrowseAction::ExpandPanel => self.split.expand(),
        }
        Effect::None
    }

    fn toggle_current_mark(&mut self) {
        let cursor = self.viewport.cursor();
        let Some(text) = self.buffer.line(cursor) else {
            return;
        };
        self.status = if self.marks.toggle(cursor, text) {
            format!("Marked L{}", cursor + 1)
        } else {
            format!("Unmarked L{}", cursor + 1)
        };
    }

    /// Mark the current line if needed and start typing its note.
    fn start_note_entry(&mut self) {
        let line = self.viewport.cursor();
        let Some(text) = self.current_line_text() else {
            return;
        };
        if !self.marks.has(line) {
            let text = text.to_string();
            self.marks.toggle(line, &text);
        }
        let buffer = self.marks.note(line).unwrap_or_default().to_string();
        self.mode = Mode::NoteEntry { line, buffer };
    }

    /// Empty the buffer and every mark together.
    pub(super) fn clear_all(&mut self) {
        self.buffer.clear();
        self.marks.clear();
        self.viewport.reset();
        self.status = "Cleared all content and marks".to_string();
        log::info!("cleared all content and marks");
    }

    fn paste_marks_to_pane(&mut self) -> String {
        let text = self.marks.export_text();
        if text.is_empty() {
            return "No marks to export".to_string();
        }
        match self.delivery.paste_to_pane(&text) {
            Ok(()) => format!("Pasted {} marks to left pane", self.marks.len()),
            Err(DeliveryError::SetBuffer(e)) => {
                log::warn!("tmux set-buffer failed: {e}");
                format!("Failed to set tmux buffer: {e}")
            }
            Err(e) => {
                log::warn!("paste to pane failed: {e}");
                format!("Failed to paste to pane: {e}")
            }
        }
    }
}
