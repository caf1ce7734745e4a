//! Capture engine for clipnote.
//!
//! Maps a pane's scroll position onto the line range to request, runs the
//! capture through a [`PaneCollaborator`], and reports the result as a
//! [`CaptureOutcome`] that never aborts the caller.

mod engine;
mod error;
mod pane;
mod window;

pub use engine::{CaptureEngine, CaptureOutcome, failure_message};
pub use error::CaptureError;
pub use pane::{PaneCollaborator, TmuxPane};
pub use window::{CaptureIntent, CaptureRange, PaneMetrics, resolve_range};
