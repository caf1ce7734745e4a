//! Error types for pane queries, captures and paste delivery.

use thiserror::Error;

/// Errors returned by a [`PaneCollaborator`](crate::PaneCollaborator).
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The tmux binary could not be started.
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// tmux ran but exited unsuccessfully; carries its trimmed output.
    #[error("{0}")]
    CommandFailed(String),

    /// The capture worker gave up waiting.
    #[error("timed out after {0}s")]
    TimedOut(u64),
}
