use crate::engine::EngineError;
use crate::types::{CommentId, DirectMessage, EngineState, Post, PostId};
use serde::Serialize;

/// A successful engine outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineResponse {
    /// A mutation was applied; carries a human readable confirmation
    Success(String),
    FeedResult(Vec<Post>),
    MessagesResult(Vec<DirectMessage>),
    StateResult(Box<EngineState>),
    PostIds(Vec<PostId>),
    CommentIds(Vec<CommentId>),
    Usernames(Vec<String>),
}

/// What the engine sends back for every request
pub type EngineReply = Result<EngineResponse, EngineError>;
