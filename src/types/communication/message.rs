use super::{EngineReply, EngineRequest};
use tokio::sync::oneshot;

/// A request paired with the channel its reply goes to
#[derive(Debug)]
pub struct EngineMessage {
    pub request: EngineRequest,
    pub reply_to: oneshot::Sender<EngineReply>,
}

impl EngineMessage {
    /// Create a new message and the receiver its reply will arrive on
    pub fn new(request: EngineRequest) -> (Self, oneshot::Receiver<EngineReply>) {
        let (reply_to, reply_rx) = oneshot::channel();
        (Self { request, reply_to }, reply_rx)
    }
}
