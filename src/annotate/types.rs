//! Type definitions for the annotation state machine.

use clipnote_bridge::BridgeCommand;
use clipnote_capture::CaptureIntent;
use clipnote_config::Config;

/// Full-screen overlay shown over the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Help,
    Note,
}

/// Interaction mode. Exactly one is active; input buffers live inside the
/// variant and disappear with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing a note for `line`.
    NoteEntry { line: usize, buffer: String },
    /// Typing how many lines to capture.
    RangeCountEntry { buffer: String },
    /// Waiting for y/n before capturing the whole history.
    FullScrollbackConfirm,
    Overlay(OverlayKind),
}

/// A capture the event loop should run off-thread.
#[derive(Debug)]
pub struct CaptureJob {
    pub intent: CaptureIntent,
    /// Bridge request waiting on this capture, answered after it is applied.
    pub reply: Option<BridgeCommand>,
}

/// What the event loop must do after an event was applied.
#[derive(Debug)]
pub enum Effect {
    None,
    Capture(CaptureJob),
    Quit,
}

impl Effect {
    pub(crate) fn capture(intent: CaptureIntent) -> Self {
        Effect::Capture(CaptureJob {
            intent,
            reply: None,
        })
    }
}

/// Content panel width in percent, adjusted in fixed steps within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSplit {
    ratio: u16,
    min: u16,
    max: u16,
    step: u16,
}

impl PanelSplit {
    pub fn new(ratio: u16, min: u16, max: u16, step: u16) -> Self {
        Self {
            ratio: ratio.clamp(min, max),
            min,
            max,
            step,
        }
    }

    pub fn ratio(&self) -> u16 {
        self.ratio
    }

    pub fn shrink(&mut self) {
        if self.ratio > self.min {
            self.ratio = self.ratio.saturating_sub(self.step).max(self.min);
        }
    }

    pub fn expand(&mut self) {
        if self.ratio < self.max {
            self.ratio = (self.ratio + self.step).min(self.max);
        }
    }
}

/// Tunables the state machine reads from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatorSettings {
    pub snapshot_width: usize,
    pub note_char_limit: usize,
    pub split: PanelSplit,
}

impl AnnotatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            snapshot_width: config.snapshot_width,
            note_char_limit: config.note_char_limit,
            split: PanelSplit::new(
                config.split_ratio,
                config.split_ratio_min,
                config.split_ratio_max,
                config.split_ratio_step,
            ),
        }
    }
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
