use crate::types::{CommentId, MessageId, PostId};
use serde::{Deserialize, Serialize};

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Karma and counter delta applied by this vote
    pub fn delta(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// The closed set of operations the engine services.
///
/// Bodies arriving over a wire layer deserialize directly into this type,
/// tagged by `type`, e.g. `{"type":"RegisterAccount","username":"alice"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineRequest {
    RegisterAccount {
        username: String,
    },
    CreateSubreddit {
        username: String,
        name: String,
    },
    JoinSubreddit {
        username: String,
        name: String,
    },
    LeaveSubreddit {
        username: String,
        name: String,
    },
    CreatePost {
        username: String,
        subreddit: String,
        content: String,
        #[serde(default)]
        is_repost: bool,
        #[serde(default)]
        original_post_id: Option<PostId>,
    },
    CreateComment {
        username: String,
        post_id: PostId,
        #[serde(default)]
        parent_comment_id: Option<CommentId>,
        content: String,
    },
    Upvote {
        username: String,
        #[serde(default)]
        post_id: Option<PostId>,
        #[serde(default)]
        comment_id: Option<CommentId>,
    },
    Downvote {
        username: String,
        #[serde(default)]
        post_id: Option<PostId>,
        #[serde(default)]
        comment_id: Option<CommentId>,
    },
    GetFeed {
        username: String,
    },
    SendMessage {
        from: String,
        to: String,
        content: String,
        #[serde(default)]
        parent_message_id: Option<MessageId>,
    },
    GetMessages {
        username: String,
    },
    ReplyToMessage {
        username: String,
        message_id: MessageId,
        content: String,
    },
    // Introspection, used by the simulator only
    GetState,
    GetAllPostIds,
    GetAllCommentIds,
    GetAllUsernames,
}

impl EngineRequest {
    /// Short name of the operation, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            EngineRequest::RegisterAccount { .. } => "RegisterAccount",
            EngineRequest::CreateSubreddit { .. } => "CreateSubreddit",
            EngineRequest::JoinSubreddit { .. } => "JoinSubreddit",
            EngineRequest::LeaveSubreddit { .. } => "LeaveSubreddit",
            EngineRequest::CreatePost { .. } => "CreatePost",
            EngineRequest::CreateComment { .. } => "CreateComment",
            EngineRequest::Upvote { .. } => "Upvote",
            EngineRequest::Downvote { .. } => "Downvote",
            EngineRequest::GetFeed { .. } => "GetFeed",
            EngineRequest::SendMessage { .. } => "SendMessage",
            EngineRequest::GetMessages { .. } => "GetMessages",
            EngineRequest::ReplyToMessage { .. } => "ReplyToMessage",
            EngineRequest::GetState => "GetState",
            EngineRequest::GetAllPostIds => "GetAllPostIds",
            EngineRequest::GetAllCommentIds => "GetAllCommentIds",
            EngineRequest::GetAllUsernames => "GetAllUsernames",
        }
    }
}
