//! Clipboard and paired-pane delivery of exported marks.

use arboard::Clipboard;
use clipnote_capture::{CaptureError, PaneCollaborator};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("clipboard not available")]
    ClipboardUnavailable,

    #[error(transparent)]
    Clipboard(#[from] arboard::Error),

    /// Loading the export into the tmux paste buffer failed.
    #[error("{0}")]
    SetBuffer(CaptureError),

    /// Pasting the buffer into the pane failed.
    #[error("{0}")]
    Paste(CaptureError),
}

/// Where exported marks go. Both calls may block briefly.
pub trait Delivery {
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliveryError>;
    fn paste_to_pane(&mut self, text: &str) -> Result<(), DeliveryError>;
}

/// System clipboard plus tmux paste into the observed pane.
pub struct SystemDelivery {
    clipboard: Option<Clipboard>,
    pane: Arc<dyn PaneCollaborator>,
    pane_id: String,
}

impl SystemDelivery {
    pub fn new(pane: Arc<dyn PaneCollaborator>, pane_id: impl Into<String>) -> Self {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::warn!("Clipboard not available: {e}");
                None
            }
        };
        Self {
            clipboard,
            pane,
            pane_id: pane_id.into(),
        }
    }
}

impl Delivery for SystemDelivery {
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliveryError> {
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or(DeliveryError::ClipboardUnavailable)?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }

    fn paste_to_pane(&mut self, text: &str) -> Result<(), DeliveryError> {
        self.pane.set_buffer(text).map_err(DeliveryError::SetBuffer)?;
        self.pane
            .paste_buffer(&self.pane_id)
            .map_err(DeliveryError::Paste)
    }
}
