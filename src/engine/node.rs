use super::EngineHandle;
use crate::types::{constants, EngineMessage, EngineState};
use crate::utils::logging;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The single writer of the platform state.
///
/// A node owns its [`EngineState`] and the receiving half of the engine
/// mailbox. Its loop handles one message at a time, so every request is
/// applied atomically with respect to every other request.
pub struct EngineNode {
    /// The authoritative platform state
    state: EngineState,
    /// Receiver for requests from every engine handle
    receiver: mpsc::Receiver<EngineMessage>,
}

impl EngineNode {
    /// Create a new EngineNode around an empty state
    pub fn new(receiver: mpsc::Receiver<EngineMessage>) -> Self {
        Self {
            state: EngineState::new(),
            receiver,
        }
    }

    /// Spawn an engine with the default mailbox capacity
    pub fn spawn() -> (EngineHandle, JoinHandle<EngineState>) {
        Self::spawn_with_capacity(constants::ENGINE_MAILBOX_CAPACITY)
    }

    /// Spawn an engine task and return a handle to it.
    ///
    /// The task ends once every handle has been dropped; awaiting the join
    /// handle yields the final state.
    pub fn spawn_with_capacity(capacity: usize) -> (EngineHandle, JoinHandle<EngineState>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let node = EngineNode::new(receiver);
        let join = tokio::spawn(node.run());
        (EngineHandle::new(sender), join)
    }

    /// Start the message processing loop
    pub async fn run(mut self) -> EngineState {
        logging::log("ENGINE", "Message loop started");
        while let Some(EngineMessage { request, reply_to }) = self.receiver.recv().await {
            let kind = request.kind();
            let reply = self.state.apply(request);
            if let Err(e) = &reply {
                tracing::debug!("{} rejected: {}", kind, e);
            }
            // The caller may have given up waiting. The request still took
            // effect; its reply is simply discarded.
            if reply_to.send(reply).is_err() {
                tracing::warn!("Reply to {} dropped, caller no longer waiting", kind);
            }
        }
        logging::log("ENGINE", "All handles dropped, message loop exiting");
        self.state
    }
}
