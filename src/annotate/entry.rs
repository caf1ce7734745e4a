//! Text entry modes: note entry, range count entry and the full-scrollback
//! confirmation.

use super::{Annotator, Effect, Mode};
use crate::keys::{COMMIT_NOTE, Key};
use clipnote_capture::CaptureIntent;

impl Annotator {
    pub(super) fn handle_note_key(&mut self, key: Key) -> Effect {
        let limit = self.note_char_limit;
        let Mode::NoteEntry { line, buffer } = &mut self.mode else {
            return Effect::None;
        };

        match key {
            k if k == COMMIT_NOTE => {
                let line = *line;
                let note = std::mem::take(buffer);
                self.mode = Mode::Browse;
                self.status.clear();
                if !note.is_empty()
                    && let Some(text) = self.buffer.line(line)
                {
                    self.marks.set_note(line, text, note);
                }
            }
            Key::Esc => {
                self.mode = Mode::Browse;
                self.status.clear();
            }
            Key::Enter => push_limited(buffer, '\n', limit),
            Key::Backspace => {
                buffer.pop();
            }
            Key::Char(c) => push_limited(buffer, c, limit),
            _ => {}
        }
        Effect::None
    }

    pub(super) fn handle_range_key(&mut self, key: Key) -> Effect {
        let Mode::RangeCountEntry { buffer } = &mut self.mode else {
            return Effect::None;
        };

        match key {
            Key::Esc => {
                self.mode = Mode::Browse;
                self.status.clear();
            }
            Key::Backspace => {
                buffer.pop();
            }
            Key::Char(c) if c.is_ascii_digit() => buffer.push(c),
            Key::Enter => {
                let input = buffer.trim().to_string();
                if input.is_empty() {
                    self.mode = Mode::FullScrollbackConfirm;
                    self.status =
                        "Scrollback may contain lots of content. Confirm capture? (y/n)"
                            .to_string();
                    return Effect::None;
                }
                match input.parse::<u64>() {
                    Ok(n) if n > 0 => {
                        self.mode = Mode::Browse;
                        self.status = format!("Capturing {n} lines...");
                        return Effect::capture(CaptureIntent::Recent(n));
                    }
                    _ => {
                        buffer.clear();
                        self.status = "Please enter a positive integer".to_string();
                    }
                }
            }
            _ => {}
        }
        Effect::None
    }

    pub(super) fn handle_confirm_key(&mut self, key: Key) -> Effect {
        self.mode = Mode::Browse;
        match key {
            Key::Char('y') | Key::Char('Y') => {
                self.status = "Capturing full scrollback...".to_string();
                Effect::capture(CaptureIntent::FullScrollback)
            }
            _ => {
                self.status = "Cancelled".to_string();
                Effect::None
            }
        }
    }
}

fn push_limited(buffer: &mut String, c: char, limit: usize) {
    if buffer.chars().count() < limit {
        buffer.push(c);
    }
}
