use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub mod communication;
pub mod constants;

pub use communication::{
    ApiReply, EngineMessage, EngineReply, EngineRequest, EngineResponse, VoteDirection,
};

/// A unique identifier for a post, formatted as `post_<seq>`
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PostId(pub String);

/// A unique identifier for a comment, formatted as `comment_<seq>`
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CommentId(pub String);

/// A unique identifier for a direct message, formatted as `msg_<seq>`
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl PostId {
    pub fn from_seq(seq: u64) -> Self {
        PostId(format!("post_{}", seq))
    }
}

impl CommentId {
    pub fn from_seq(seq: u64) -> Self {
        CommentId(format!("comment_{}", seq))
    }
}

impl MessageId {
    pub fn from_seq(seq: u64) -> Self {
        MessageId(format!("msg_{}", seq))
    }
}

/// A registered user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique, immutable account name
    pub username: String,
    /// Net score from votes on this account's posts and comments
    pub karma: i64,
    /// Subreddits this account has joined, in join order
    pub joined_subreddits: Vec<String>,
}

impl Account {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            karma: 0,
            joined_subreddits: Vec::new(),
        }
    }

    pub fn has_joined(&self, subreddit: &str) -> bool {
        self.joined_subreddits.iter().any(|s| s == subreddit)
    }
}

/// A community that accounts can join and post into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subreddit {
    /// Unique subreddit name
    pub name: String,
    /// Usernames of the members, in join order
    pub members: Vec<String>,
}

impl Subreddit {
    pub fn is_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }
}

/// A post submitted to a subreddit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub subreddit: String,
    pub content: String,
    /// Logical post-counter value at creation
    pub created_at: u64,
    pub upvotes: u64,
    pub downvotes: u64,
    pub is_repost: bool,
    /// The reposted post; not checked for existence
    pub original_post_id: Option<PostId>,
}

impl Post {
    /// Net score used for feed ranking
    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

/// A comment on a post, optionally nested under another comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub created_at: u64,
    pub upvotes: u64,
    pub downvotes: u64,
}

/// A private message between two accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: MessageId,
    pub from: String,
    pub to: String,
    pub content: String,
    pub created_at: u64,
    /// Set when this message is a reply
    pub parent_message_id: Option<MessageId>,
}

impl DirectMessage {
    /// Returns the participant that is not `username`
    pub fn other_party(&self, username: &str) -> &str {
        if self.from == username {
            &self.to
        } else {
            &self.from
        }
    }
}

/// The complete platform state owned by the engine.
///
/// Counters start at zero, are used as both the id suffix and the logical
/// creation timestamp, and only ever move forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub accounts: HashMap<String, Account>,
    pub subreddits: HashMap<String, Subreddit>,
    pub posts: HashMap<PostId, Post>,
    pub comments: HashMap<CommentId, Comment>,
    pub messages: HashMap<MessageId, DirectMessage>,
    pub post_counter: u64,
    pub comment_counter: u64,
    pub message_counter: u64,
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
