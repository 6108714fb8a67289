//! The platform state machine.
//!
//! Every mutation validates all of its preconditions before touching the
//! state, so a failed request leaves maps and counters exactly as they were.

use super::EngineError;
use crate::types::{
    Account, Comment, CommentId, DirectMessage, EngineReply, EngineRequest, EngineResponse,
    EngineState, MessageId, Post, PostId, Subreddit, VoteDirection,
};

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a request to the matching operation
    pub fn apply(&mut self, request: EngineRequest) -> EngineReply {
        match request {
            EngineRequest::RegisterAccount { username } => {
                self.register_account(username).map(EngineResponse::Success)
            }
            EngineRequest::CreateSubreddit { username, name } => {
                self.create_subreddit(&username, name).map(EngineResponse::Success)
            }
            EngineRequest::JoinSubreddit { username, name } => {
                self.join_subreddit(&username, &name).map(EngineResponse::Success)
            }
            EngineRequest::LeaveSubreddit { username, name } => {
                self.leave_subreddit(&username, &name).map(EngineResponse::Success)
            }
            EngineRequest::CreatePost {
                username,
                subreddit,
                content,
                is_repost,
                original_post_id,
            } => self
                .create_post(username, subreddit, content, is_repost, original_post_id)
                .map(|id| EngineResponse::Success(format!("Post created: {}", id))),
            EngineRequest::CreateComment {
                username,
                post_id,
                parent_comment_id,
                content,
            } => self
                .create_comment(username, post_id, parent_comment_id, content)
                .map(|id| EngineResponse::Success(format!("Comment created: {}", id))),
            EngineRequest::Upvote {
                post_id,
                comment_id,
                ..
            } => self
                .vote(post_id, comment_id, VoteDirection::Up)
                .map(EngineResponse::Success),
            EngineRequest::Downvote {
                post_id,
                comment_id,
                ..
            } => self
                .vote(post_id, comment_id, VoteDirection::Down)
                .map(EngineResponse::Success),
            EngineRequest::GetFeed { username } => {
                Ok(EngineResponse::FeedResult(self.feed(&username)))
            }
            EngineRequest::SendMessage {
                from,
                to,
                content,
                parent_message_id,
            } => self
                .send_message(from, to, content, parent_message_id)
                .map(|id| EngineResponse::Success(format!("Message sent: {}", id))),
            EngineRequest::GetMessages { username } => {
                Ok(EngineResponse::MessagesResult(self.messages_for(&username)))
            }
            EngineRequest::ReplyToMessage {
                username,
                message_id,
                content,
            } => self
                .reply_to_message(&username, message_id, content)
                .map(|id| EngineResponse::Success(format!("Reply sent: {}", id))),
            EngineRequest::GetState => Ok(EngineResponse::StateResult(Box::new(self.clone()))),
            EngineRequest::GetAllPostIds => Ok(EngineResponse::PostIds(self.post_ids())),
            EngineRequest::GetAllCommentIds => Ok(EngineResponse::CommentIds(self.comment_ids())),
            EngineRequest::GetAllUsernames => Ok(EngineResponse::Usernames(self.usernames())),
        }
    }

    pub fn register_account(&mut self, username: String) -> Result<String, EngineError> {
        if self.accounts.contains_key(&username) {
            return Err(EngineError::UsernameTaken(username));
        }
        let message = format!("Account registered: {}", username);
        self.accounts.insert(username.clone(), Account::new(username));
        Ok(message)
    }

    pub fn create_subreddit(
        &mut self,
        username: &str,
        name: String,
    ) -> Result<String, EngineError> {
        if !self.accounts.contains_key(username) {
            return Err(EngineError::CreatorNotFound(username.to_string()));
        }
        if self.subreddits.contains_key(&name) {
            return Err(EngineError::SubredditTaken(name));
        }
        if let Some(account) = self.accounts.get_mut(username) {
            account.joined_subreddits.push(name.clone());
        }
        let message = format!("Subreddit created: {}", name);
        self.subreddits.insert(
            name.clone(),
            Subreddit {
                name,
                members: vec![username.to_string()],
            },
        );
        Ok(message)
    }

    pub fn join_subreddit(&mut self, username: &str, name: &str) -> Result<String, EngineError> {
        let subreddit = self
            .subreddits
            .get(name)
            .ok_or_else(|| EngineError::SubredditNotFound(name.to_string()))?;
        if subreddit.is_member(username) {
            return Err(EngineError::AlreadyMember {
                username: username.to_string(),
                subreddit: name.to_string(),
            });
        }
        let account = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| EngineError::UserNotFound(username.to_string()))?;
        account.joined_subreddits.push(name.to_string());
        if let Some(subreddit) = self.subreddits.get_mut(name) {
            subreddit.members.push(username.to_string());
        }
        Ok(format!("Joined subreddit: {}", name))
    }

    pub fn leave_subreddit(&mut self, username: &str, name: &str) -> Result<String, EngineError> {
        if !self.subreddits.contains_key(name) {
            return Err(EngineError::SubredditNotFound(name.to_string()));
        }
        let account = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| EngineError::UserNotFound(username.to_string()))?;
        account.joined_subreddits.retain(|s| s != name);
        if let Some(subreddit) = self.subreddits.get_mut(name) {
            subreddit.members.retain(|m| m != username);
        }
        Ok(format!("Left subreddit: {}", name))
    }

    pub fn create_post(
        &mut self,
        username: String,
        subreddit: String,
        content: String,
        is_repost: bool,
        original_post_id: Option<PostId>,
    ) -> Result<PostId, EngineError> {
        let target = self
            .subreddits
            .get(&subreddit)
            .ok_or_else(|| EngineError::SubredditNotFound(subreddit.clone()))?;
        if !target.is_member(&username) {
            return Err(EngineError::NotAMember { username, subreddit });
        }

        let created_at = self.post_counter;
        let id = PostId::from_seq(created_at);
        self.post_counter += 1;
        self.posts.insert(
            id.clone(),
            Post {
                id: id.clone(),
                author: username,
                subreddit,
                content,
                created_at,
                upvotes: 0,
                downvotes: 0,
                is_repost,
                original_post_id,
            },
        );
        Ok(id)
    }

    pub fn create_comment(
        &mut self,
        username: String,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        content: String,
    ) -> Result<CommentId, EngineError> {
        if !self.posts.contains_key(&post_id) {
            return Err(EngineError::PostNotFound(post_id));
        }
        if let Some(parent) = &parent_comment_id {
            if !self.comments.contains_key(parent) {
                return Err(EngineError::ParentCommentNotFound(parent.clone()));
            }
        }

        let created_at = self.comment_counter;
        let id = CommentId::from_seq(created_at);
        self.comment_counter += 1;
        self.comments.insert(
            id.clone(),
            Comment {
                id: id.clone(),
                author: username,
                post_id,
                parent_comment_id,
                content,
                created_at,
                upvotes: 0,
                downvotes: 0,
            },
        );
        Ok(id)
    }

    /// Apply one vote to a post or a comment and the matching karma delta to its author.
    ///
    /// The voter is not recorded: self-votes and repeat votes all count.
    pub fn vote(
        &mut self,
        post_id: Option<PostId>,
        comment_id: Option<CommentId>,
        direction: VoteDirection,
    ) -> Result<String, EngineError> {
        let (author, target) = match (post_id, comment_id) {
            (Some(post_id), None) => {
                let post = self
                    .posts
                    .get_mut(&post_id)
                    .ok_or_else(|| EngineError::PostNotFound(post_id.clone()))?;
                match direction {
                    VoteDirection::Up => post.upvotes += 1,
                    VoteDirection::Down => post.downvotes += 1,
                }
                (post.author.clone(), post_id.0)
            }
            (None, Some(comment_id)) => {
                let comment = self
                    .comments
                    .get_mut(&comment_id)
                    .ok_or_else(|| EngineError::CommentNotFound(comment_id.clone()))?;
                match direction {
                    VoteDirection::Up => comment.upvotes += 1,
                    VoteDirection::Down => comment.downvotes += 1,
                }
                (comment.author.clone(), comment_id.0)
            }
            (None, None) => return Err(EngineError::MissingVoteTarget),
            (Some(_), Some(_)) => return Err(EngineError::AmbiguousVoteTarget),
        };

        // Accounts are never deleted, so the author is always present.
        if let Some(account) = self.accounts.get_mut(&author) {
            account.karma += direction.delta();
        }
        Ok(match direction {
            VoteDirection::Up => format!("Upvoted {}", target),
            VoteDirection::Down => format!("Downvoted {}", target),
        })
    }

    /// Posts from the user's joined subreddits, best score first.
    ///
    /// Equal scores are ordered by creation, oldest first.
    pub fn feed(&self, username: &str) -> Vec<Post> {
        let Some(account) = self.accounts.get(username) else {
            return Vec::new();
        };
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|post| account.has_joined(&post.subreddit))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.score().cmp(&a.score()).then(a.created_at.cmp(&b.created_at)));
        posts
    }

    pub fn send_message(
        &mut self,
        from: String,
        to: String,
        content: String,
        parent_message_id: Option<MessageId>,
    ) -> Result<MessageId, EngineError> {
        if !self.accounts.contains_key(&from) {
            return Err(EngineError::UserNotFound(from));
        }
        if !self.accounts.contains_key(&to) {
            return Err(EngineError::UserNotFound(to));
        }

        let created_at = self.message_counter;
        let id = MessageId::from_seq(created_at);
        self.message_counter += 1;
        self.messages.insert(
            id.clone(),
            DirectMessage {
                id: id.clone(),
                from,
                to,
                content,
                created_at,
                parent_message_id,
            },
        );
        Ok(id)
    }

    /// Every message sent or received by `username`, oldest first
    pub fn messages_for(&self, username: &str) -> Vec<DirectMessage> {
        let mut messages: Vec<DirectMessage> = self
            .messages
            .values()
            .filter(|m| m.from == username || m.to == username)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        messages
    }

    pub fn reply_to_message(
        &mut self,
        username: &str,
        message_id: MessageId,
        content: String,
    ) -> Result<MessageId, EngineError> {
        let original = self
            .messages
            .get(&message_id)
            .ok_or_else(|| EngineError::MessageNotFound(message_id.clone()))?;
        let recipient = original.other_party(username).to_string();
        self.send_message(username.to_string(), recipient, content, Some(message_id))
    }

    pub fn post_ids(&self) -> Vec<PostId> {
        let mut ids: Vec<PostId> = self.posts.keys().cloned().collect();
        ids.sort_by_key(|id| self.posts[id].created_at);
        ids
    }

    pub fn comment_ids(&self) -> Vec<CommentId> {
        let mut ids: Vec<CommentId> = self.comments.keys().cloned().collect();
        ids.sort_by_key(|id| self.comments[id].created_at);
        ids
    }

    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accounts.keys().cloned().collect();
        names.sort();
        names
    }
}
