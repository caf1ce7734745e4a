//! Requests arriving over the command bridge.
//!
//! These run on the same consumer as key presses, in whatever mode is
//! active, so they never interleave with a keyboard mutation.

use super::{Annotator, CaptureJob, Effect};
use clipnote_bridge::{
    BridgeCommand, BridgeRequest, BridgeResponse, ExportSummary, MarkEntry, MarkSummary,
};
use clipnote_capture::CaptureIntent;

impl Annotator {
    /// Apply a bridge request. Everything but `capture` is answered before
    /// this returns; a capture is answered once its result is applied.
    pub fn handle_bridge(&mut self, command: BridgeCommand) -> Effect {
        log::debug!("bridge request {:?}", command.request);
        let response = match &command.request {
            BridgeRequest::Capture => None,
            BridgeRequest::Mark(lines) => Some(BridgeResponse::result(&MarkSummary {
                marked: self.mark_lines(lines),
            })),
            BridgeRequest::GetMarks => Some(BridgeResponse::result(&self.mark_entries())),
            BridgeRequest::Export => Some(BridgeResponse::result(&self.export_marks())),
        };

        match response {
            Some(response) => {
                command.respond(response);
                Effect::None
            }
            None => Effect::Capture(CaptureJob {
                intent: CaptureIntent::Visible,
                reply: Some(command),
            }),
        }
    }

    /// Mark every in-range, unmarked line. Returns how many were newly marked.
    fn mark_lines(&mut self, lines: &[i64]) -> usize {
        let mut marked = 0;
        for &line in lines {
            let Ok(line) = usize::try_from(line) else {
                continue;
            };
            let Some(text) = self.buffer.line(line) else {
                continue;
            };
            if !self.marks.has(line) {
                self.marks.toggle(line, text);
                marked += 1;
            }
        }
        self.status = format!("Marked {marked} lines via IPC");
        marked
    }

    fn mark_entries(&self) -> Vec<MarkEntry> {
        self.marks
            .iter()
            .map(|mark| MarkEntry {
                line: mark.line,
                text: mark.text.clone(),
                note: mark.note.clone().filter(|n| !n.is_empty()),
            })
            .collect()
    }

    fn export_marks(&mut self) -> ExportSummary {
        let exported = self.marks.export_text();
        let status = self.copy_marks_to_clipboard();
        self.status = status.clone();
        ExportSummary { exported, status }
    }
}
