//! Bridge error type.
//!
//! The protocol variants render exactly as the `message` sent back to the
//! client.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid request")]
    InvalidRequest,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("no lines specified")]
    NoLines,

    #[error("annotation loop not ready")]
    NotReady,

    #[error("annotation loop has shut down")]
    LoopClosed,

    #[error("annotation loop dropped the request")]
    ReplyDropped,

    #[error("cannot connect to clipnote at {} (is the annotation panel running?): {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("server closed connection")]
    Closed,

    #[error("client idle for {0:?}")]
    Idle(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
