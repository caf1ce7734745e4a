//! The message a bridge connection hands to the annotation loop.

use crate::protocol::{BridgeRequest, BridgeResponse};
use tokio::sync::oneshot;

/// A request plus the channel its single response goes back on.
#[derive(Debug)]
pub struct BridgeCommand {
    pub request: BridgeRequest,
    pub reply: oneshot::Sender<BridgeResponse>,
}

impl BridgeCommand {
    pub fn new(request: BridgeRequest) -> (Self, oneshot::Receiver<BridgeResponse>) {
        let (reply, rx) = oneshot::channel();
        (Self { request, reply }, rx)
    }

    /// Send the response. A caller that already hung up is only logged.
    pub fn respond(self, response: BridgeResponse) {
        if self.reply.send(response).is_err() {
            log::debug!("bridge client went away before its {:?} reply", self.request);
        }
    }
}
