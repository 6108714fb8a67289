use crate::types::{
    CommentId, DirectMessage, EngineReply, EngineRequest, EngineResponse, EngineState, MessageId,
    Post, PostId,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod handle;
pub mod node;
pub mod state;

pub use handle::EngineHandle;
pub use node::EngineNode;

#[cfg(test)]
mod tests;

/// Broad category of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Duplicate username or subreddit, or an existing membership
    Conflict,
    /// Unknown username, subreddit, post, comment or message
    NotFound,
    /// The request itself is malformed or not permitted
    Validation,
    /// No reply arrived within the bounded wait
    Timeout,
    /// The engine task is gone
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Username already exists")]
    UsernameTaken(String),
    #[error("Subreddit already exists")]
    SubredditTaken(String),
    #[error("User is already a member of this subreddit")]
    AlreadyMember { username: String, subreddit: String },
    #[error("User must exist to create a subreddit")]
    CreatorNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Subreddit not found: {0}")]
    SubredditNotFound(String),
    #[error("User {username} is not a member of {subreddit}")]
    NotAMember { username: String, subreddit: String },
    #[error("Post not found: {0}")]
    PostNotFound(PostId),
    #[error("Parent comment not found: {0}")]
    ParentCommentNotFound(CommentId),
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),
    #[error("Must specify post_id or comment_id")]
    MissingVoteTarget,
    #[error("Specify only one of post_id or comment_id")]
    AmbiguousVoteTarget,
    #[error("No reply to {0} within the timeout")]
    Timeout(&'static str),
    #[error("Engine is not running")]
    EngineUnavailable,
    #[error("Unexpected response to {0}")]
    UnexpectedResponse(&'static str),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UsernameTaken(_)
            | EngineError::SubredditTaken(_)
            | EngineError::AlreadyMember { .. } => ErrorKind::Conflict,
            EngineError::CreatorNotFound(_)
            | EngineError::UserNotFound(_)
            | EngineError::SubredditNotFound(_)
            | EngineError::PostNotFound(_)
            | EngineError::ParentCommentNotFound(_)
            | EngineError::CommentNotFound(_)
            | EngineError::MessageNotFound(_) => ErrorKind::NotFound,
            EngineError::NotAMember { .. }
            | EngineError::MissingVoteTarget
            | EngineError::AmbiguousVoteTarget
            | EngineError::UnexpectedResponse(_) => ErrorKind::Validation,
            EngineError::Timeout(_) => ErrorKind::Timeout,
            EngineError::EngineUnavailable => ErrorKind::Unavailable,
        }
    }
}

/// Typed access to the platform engine.
///
/// Implementors only provide [`Engine::request`]; every operation is a thin
/// wrapper that builds the request and unpacks the expected response.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Send one request and wait for its reply
    async fn request(&self, request: EngineRequest) -> EngineReply;

    async fn register_account(&self, username: &str) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::RegisterAccount {
                username: username.to_string(),
            })
            .await,
            "RegisterAccount",
        )
    }

    async fn create_subreddit(&self, username: &str, name: &str) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::CreateSubreddit {
                username: username.to_string(),
                name: name.to_string(),
            })
            .await,
            "CreateSubreddit",
        )
    }

    async fn join_subreddit(&self, username: &str, name: &str) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::JoinSubreddit {
                username: username.to_string(),
                name: name.to_string(),
            })
            .await,
            "JoinSubreddit",
        )
    }

    async fn leave_subreddit(&self, username: &str, name: &str) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::LeaveSubreddit {
                username: username.to_string(),
                name: name.to_string(),
            })
            .await,
            "LeaveSubreddit",
        )
    }

    async fn create_post(
        &self,
        username: &str,
        subreddit: &str,
        content: &str,
        is_repost: bool,
        original_post_id: Option<PostId>,
    ) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::CreatePost {
                username: username.to_string(),
                subreddit: subreddit.to_string(),
                content: content.to_string(),
                is_repost,
                original_post_id,
            })
            .await,
            "CreatePost",
        )
    }

    async fn create_comment(
        &self,
        username: &str,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        content: &str,
    ) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::CreateComment {
                username: username.to_string(),
                post_id,
                parent_comment_id,
                content: content.to_string(),
            })
            .await,
            "CreateComment",
        )
    }

    async fn upvote(
        &self,
        username: &str,
        post_id: Option<PostId>,
        comment_id: Option<CommentId>,
    ) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::Upvote {
                username: username.to_string(),
                post_id,
                comment_id,
            })
            .await,
            "Upvote",
        )
    }

    async fn downvote(
        &self,
        username: &str,
        post_id: Option<PostId>,
        comment_id: Option<CommentId>,
    ) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::Downvote {
                username: username.to_string(),
                post_id,
                comment_id,
            })
            .await,
            "Downvote",
        )
    }

    async fn get_feed(&self, username: &str) -> Result<Vec<Post>, EngineError> {
        match self
            .request(EngineRequest::GetFeed {
                username: username.to_string(),
            })
            .await?
        {
            EngineResponse::FeedResult(posts) => Ok(posts),
            _ => Err(EngineError::UnexpectedResponse("GetFeed")),
        }
    }

    async fn send_message(
        &self,
        from: &str,
        to: &str,
        content: &str,
        parent_message_id: Option<MessageId>,
    ) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::SendMessage {
                from: from.to_string(),
                to: to.to_string(),
                content: content.to_string(),
                parent_message_id,
            })
            .await,
            "SendMessage",
        )
    }

    async fn get_messages(&self, username: &str) -> Result<Vec<DirectMessage>, EngineError> {
        match self
            .request(EngineRequest::GetMessages {
                username: username.to_string(),
            })
            .await?
        {
            EngineResponse::MessagesResult(messages) => Ok(messages),
            _ => Err(EngineError::UnexpectedResponse("GetMessages")),
        }
    }

    async fn reply_to_message(
        &self,
        username: &str,
        message_id: MessageId,
        content: &str,
    ) -> Result<String, EngineError> {
        expect_success(
            self.request(EngineRequest::ReplyToMessage {
                username: username.to_string(),
                message_id,
                content: content.to_string(),
            })
            .await,
            "ReplyToMessage",
        )
    }

    async fn get_state(&self) -> Result<EngineState, EngineError> {
        match self.request(EngineRequest::GetState).await? {
            EngineResponse::StateResult(state) => Ok(*state),
            _ => Err(EngineError::UnexpectedResponse("GetState")),
        }
    }

    async fn get_all_post_ids(&self) -> Result<Vec<PostId>, EngineError> {
        match self.request(EngineRequest::GetAllPostIds).await? {
            EngineResponse::PostIds(ids) => Ok(ids),
            _ => Err(EngineError::UnexpectedResponse("GetAllPostIds")),
        }
    }

    async fn get_all_comment_ids(&self) -> Result<Vec<CommentId>, EngineError> {
        match self.request(EngineRequest::GetAllCommentIds).await? {
            EngineResponse::CommentIds(ids) => Ok(ids),
            _ => Err(EngineError::UnexpectedResponse("GetAllCommentIds")),
        }
    }

    async fn get_all_usernames(&self) -> Result<Vec<String>, EngineError> {
        match self.request(EngineRequest::GetAllUsernames).await? {
            EngineResponse::Usernames(names) => Ok(names),
            _ => Err(EngineError::UnexpectedResponse("GetAllUsernames")),
        }
    }
}

fn expect_success(reply: EngineReply, operation: &'static str) -> Result<String, EngineError> {
    match reply? {
        EngineResponse::Success(message) => Ok(message),
        _ => Err(EngineError::UnexpectedResponse(operation)),
    }
}
