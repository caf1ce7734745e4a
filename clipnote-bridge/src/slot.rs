use std::sync::OnceLock;
use tokio::sync::mpsc;

/// Set-once holder for the annotation loop's event sender.
///
/// The bridge listener is started before the loop exists; until the loop
/// calls [`EventSlot::install`], requests are answered with a readiness
/// error instead of waiting.
#[derive(Debug)]
pub struct EventSlot<E> {
    sender: OnceLock<mpsc::Sender<E>>,
}

impl<E> EventSlot<E> {
    pub const fn new() -> Self {
        Self {
            sender: OnceLock::new(),
        }
    }

    /// Install the loop's sender. Returns `false` if one was already set.
    pub fn install(&self, sender: mpsc::Sender<E>) -> bool {
        self.sender.set(sender).is_ok()
    }

    pub fn sender(&self) -> Option<&mpsc::Sender<E>> {
        self.sender.get()
    }
}

impl<E> Default for EventSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}
