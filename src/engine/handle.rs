use super::{Engine, EngineError};
use crate::types::{constants, EngineMessage, EngineReply, EngineRequest};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// A cloneable client of the engine.
///
/// Every request waits for its reply for at most `timeout`. A request that
/// times out is abandoned by the caller but still executes at the engine.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineMessage>,
    timeout: Duration,
}

impl EngineHandle {
    /// Wrap an engine mailbox sender, using the action timeout
    pub fn new(sender: mpsc::Sender<EngineMessage>) -> Self {
        Self {
            sender,
            timeout: constants::ACTION_TIMEOUT,
        }
    }

    /// A handle to the same engine with a different reply bound
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout,
        }
    }

    /// Whether the engine task has stopped receiving
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[async_trait]
impl Engine for EngineHandle {
    async fn request(&self, request: EngineRequest) -> EngineReply {
        let kind = request.kind();
        let (message, reply_rx) = EngineMessage::new(request);
        // The wait covers both mailbox admission and the reply itself.
        let exchange = async {
            self.sender
                .send(message)
                .await
                .map_err(|_| EngineError::EngineUnavailable)?;
            reply_rx.await.map_err(|_| EngineError::EngineUnavailable)?
        };
        match timeout(self.timeout, exchange).await {
            Ok(reply) => reply,
            Err(_) => Err(EngineError::Timeout(kind)),
        }
    }
}
