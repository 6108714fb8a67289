//! Simulated client actors.
//!
//! Each client is its own task with its own mailbox. A session is a fixed
//! number of randomized actions against the engine; every engine failure or
//! timeout is counted, never retried and never propagated.

use rand::rngs::StdRng;
use rand::Rng;
use reddit_engine::{
    types::{constants, CommentId, PostId},
    utils::logging,
    Engine, EngineError, EngineHandle,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const CLIENT_MAILBOX_CAPACITY: usize = 8;

// ------------------------------------------------------------------------------------------------
// Data Structures
// ------------------------------------------------------------------------------------------------

/// Snapshot of one client's counters.
///
/// The default value is the zeroed placeholder used when a client fails to
/// report in time; only a real report has `reported` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStats {
    pub username: String,
    pub reported: bool,
    pub connected: bool,
    pub subreddits: Vec<String>,
    pub actions_performed: usize,
    pub messages_sent: u64,
    pub posts_created: u64,
    pub comments_created: u64,
    pub successful_ops: u64,
    pub failed_ops: u64,
}

/// What a client learns from the setup phase
#[derive(Debug, Clone)]
pub struct ClientSetup {
    pub username: String,
    /// Subreddits joined during setup
    pub subreddits: Vec<String>,
    /// Every simulated username, shared by all clients
    pub known_usernames: Arc<Vec<String>>,
    /// Setup-time join count per subreddit, shared by all clients
    pub popularity: Arc<HashMap<String, usize>>,
    /// Size of the seeded subreddit pool
    pub num_subreddits: usize,
}

/// Messages a client actor accepts
#[derive(Debug)]
pub enum ClientCommand {
    /// Run a session of `actions` randomized actions
    Start { actions: usize },
    /// Reply with the current counters
    ReportStats { reply_to: oneshot::Sender<ClientStats> },
}

/// The actions a client can take; one is drawn uniformly from ten slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    JoinSubreddit,
    CreatePost,
    Comment,
    Vote,
    GetFeed,
    SendMessage,
    GetMessages,
    Disconnect,
    Idle,
}

impl Action {
    /// Maps a draw in `[0, 10)` to an action; slot 9 is idle
    pub fn from_draw(draw: u32) -> Self {
        match draw {
            0 => Action::Register,
            1 => Action::JoinSubreddit,
            2 => Action::CreatePost,
            3 => Action::Comment,
            4 => Action::Vote,
            5 => Action::GetFeed,
            6 => Action::SendMessage,
            7 => Action::GetMessages,
            8 => Action::Disconnect,
            _ => Action::Idle,
        }
    }
}

/// Chance that a create-post action goes ahead, given the subreddit's popularity
pub fn posting_probability(popularity: usize) -> f64 {
    if popularity > 10 {
        0.40
    } else if popularity > 5 {
        0.25
    } else {
        0.15
    }
}

// ------------------------------------------------------------------------------------------------
// Handle
// ------------------------------------------------------------------------------------------------

/// Cloneable mailbox address of a client actor
#[derive(Clone, Debug)]
pub struct ClientHandle {
    username: String,
    sender: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Ask the client to run its session. Returns false if the client is gone.
    pub async fn start(&self, actions: usize) -> bool {
        self.sender.send(ClientCommand::Start { actions }).await.is_ok()
    }

    /// Request the client's counters, waiting at most `wait`.
    ///
    /// A request queued behind a running session is answered once the
    /// session ends. Returns `None` if no report arrives in time.
    pub async fn report_stats(&self, wait: Duration) -> Option<ClientStats> {
        let (reply_to, reply_rx) = oneshot::channel();
        let exchange = async {
            self.sender.send(ClientCommand::ReportStats { reply_to }).await.ok()?;
            reply_rx.await.ok()
        };
        timeout(wait, exchange).await.ok().flatten()
    }
}

// ------------------------------------------------------------------------------------------------
// Actor
// ------------------------------------------------------------------------------------------------

pub struct ClientActor {
    username: String,
    engine: EngineHandle,
    rng: StdRng,
    receiver: mpsc::Receiver<ClientCommand>,

    connected: bool,
    subreddits: Vec<String>,
    known_post_ids: Vec<PostId>,
    known_comment_ids: Vec<CommentId>,
    known_usernames: Arc<Vec<String>>,
    popularity: Arc<HashMap<String, usize>>,
    num_subreddits: usize,

    messages_sent: u64,
    posts_created: u64,
    comments_created: u64,
    successful_ops: u64,
    failed_ops: u64,

    /// Actions with an index below this are skipped
    disconnected_until: usize,
    current_action: usize,
}

impl ClientActor {
    pub fn new(
        setup: ClientSetup,
        engine: EngineHandle,
        rng: StdRng,
        receiver: mpsc::Receiver<ClientCommand>,
    ) -> Self {
        Self {
            username: setup.username,
            engine,
            rng,
            receiver,
            connected: true,
            subreddits: setup.subreddits,
            known_post_ids: Vec::new(),
            known_comment_ids: Vec::new(),
            known_usernames: setup.known_usernames,
            popularity: setup.popularity,
            num_subreddits: setup.num_subreddits,
            messages_sent: 0,
            posts_created: 0,
            comments_created: 0,
            successful_ops: 0,
            failed_ops: 0,
            disconnected_until: 0,
            current_action: 0,
        }
    }

    /// Spawn a client task and return its handle
    pub fn spawn(
        setup: ClientSetup,
        engine: EngineHandle,
        rng: StdRng,
    ) -> (ClientHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(CLIENT_MAILBOX_CAPACITY);
        let handle = ClientHandle {
            username: setup.username.clone(),
            sender,
        };
        let actor = ClientActor::new(setup, engine, rng, receiver);
        let join = tokio::spawn(actor.run());
        (handle, join)
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                ClientCommand::Start { actions } => self.run_session(actions).await,
                ClientCommand::ReportStats { reply_to } => {
                    // The driver may have stopped waiting; nothing to do then.
                    let _ = reply_to.send(self.stats());
                }
            }
        }
    }

    pub async fn run_session(&mut self, actions: usize) {
        logging::log(
            "CLIENT",
            &format!("{} starting session of {} actions", self.username, actions),
        );
        for _ in 0..actions {
            self.perform_action().await;
        }
        logging::log(
            "CLIENT",
            &format!(
                "{} finished: {} ok, {} failed",
                self.username, self.successful_ops, self.failed_ops
            ),
        );
    }

    pub fn stats(&self) -> ClientStats {
        ClientStats {
            username: self.username.clone(),
            reported: true,
            connected: self.connected,
            subreddits: self.subreddits.clone(),
            actions_performed: self.current_action,
            messages_sent: self.messages_sent,
            posts_created: self.posts_created,
            comments_created: self.comments_created,
            successful_ops: self.successful_ops,
            failed_ops: self.failed_ops,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.current_action < self.disconnected_until
    }

    /// Take the next action of the session
    pub async fn perform_action(&mut self) {
        if self.is_disconnected() {
            self.current_action += 1;
            return;
        }
        if !self.connected {
            self.connected = true;
            logging::log("CLIENT", &format!("{} reconnected", self.username));
        }

        let action = Action::from_draw(self.rng.gen_range(0..10));
        match action {
            Action::Register => self.register().await,
            Action::JoinSubreddit => self.join_subreddit().await,
            Action::CreatePost => self.create_post().await,
            Action::Comment => self.comment().await,
            Action::Vote => self.vote().await,
            Action::GetFeed => {
                let result = self.engine.get_feed(&self.username).await;
                self.record(result);
            }
            Action::SendMessage => self.send_message().await,
            Action::GetMessages => {
                let result = self.engine.get_messages(&self.username).await;
                self.record(result);
            }
            Action::Disconnect => self.disconnect(),
            Action::Idle => {}
        }
        self.current_action += 1;
    }

    /// Count the outcome of one engine call
    fn record<T>(&mut self, result: Result<T, EngineError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.successful_ops += 1;
                Some(value)
            }
            Err(e) => {
                self.failed_ops += 1;
                logging::log("CLIENT", &format!("{} operation failed: {}", self.username, e));
                None
            }
        }
    }

    async fn register(&mut self) {
        // Already registered during setup, so this is expected to conflict.
        let result = self.engine.register_account(&self.username).await;
        self.record(result);
    }

    async fn join_subreddit(&mut self) {
        if self.num_subreddits == 0 {
            return;
        }
        let name = constants::subreddit_name(self.rng.gen_range(0..self.num_subreddits));
        let result = self.engine.join_subreddit(&self.username, &name).await;
        if self.record(result).is_some() {
            self.subreddits.push(name);
        }
    }

    async fn create_post(&mut self) {
        if self.subreddits.is_empty() {
            return;
        }
        let subreddit = self.subreddits[self.rng.gen_range(0..self.subreddits.len())].clone();
        let popularity = self.popularity.get(&subreddit).copied().unwrap_or(0);
        if self.rng.gen::<f64>() >= posting_probability(popularity) {
            return;
        }

        let original_post_id = if !self.known_post_ids.is_empty() && self.rng.gen_bool(0.2) {
            Some(self.known_post_ids[self.rng.gen_range(0..self.known_post_ids.len())].clone())
        } else {
            None
        };
        let content = format!(
            "Post by {} in {} (action {})",
            self.username, subreddit, self.current_action
        );
        let result = self
            .engine
            .create_post(
                &self.username,
                &subreddit,
                &content,
                original_post_id.is_some(),
                original_post_id,
            )
            .await;
        if self.record(result).is_some() {
            self.posts_created += 1;
            let ids = self.engine.get_all_post_ids().await;
            if let Some(ids) = self.record(ids) {
                self.known_post_ids = ids;
            }
        }
    }

    async fn comment(&mut self) {
        if self.known_post_ids.is_empty() {
            return;
        }
        let post_id = self.known_post_ids[self.rng.gen_range(0..self.known_post_ids.len())].clone();
        let parent_comment_id = if !self.known_comment_ids.is_empty() && self.rng.gen_bool(0.3) {
            let index = self.rng.gen_range(0..self.known_comment_ids.len());
            Some(self.known_comment_ids[index].clone())
        } else {
            None
        };
        let content = format!("Comment by {} on {}", self.username, post_id);
        let result = self
            .engine
            .create_comment(&self.username, post_id, parent_comment_id, &content)
            .await;
        if self.record(result).is_some() {
            self.comments_created += 1;
            let ids = self.engine.get_all_comment_ids().await;
            if let Some(ids) = self.record(ids) {
                self.known_comment_ids = ids;
            }
        }
    }

    async fn vote(&mut self) {
        let (post_id, comment_id) = if self.rng.gen_bool(0.7) {
            if self.known_post_ids.is_empty() {
                return;
            }
            let id = self.known_post_ids[self.rng.gen_range(0..self.known_post_ids.len())].clone();
            (Some(id), None)
        } else {
            if self.known_comment_ids.is_empty() {
                return;
            }
            let index = self.rng.gen_range(0..self.known_comment_ids.len());
            let id = self.known_comment_ids[index].clone();
            (None, Some(id))
        };

        let result = if self.rng.gen_bool(0.7) {
            self.engine.upvote(&self.username, post_id, comment_id).await
        } else {
            self.engine.downvote(&self.username, post_id, comment_id).await
        };
        self.record(result);
    }

    async fn send_message(&mut self) {
        let candidates: Vec<&String> = self
            .known_usernames
            .iter()
            .filter(|name| **name != self.username)
            .collect();
        if candidates.is_empty() {
            // No distinct recipient exists
            self.failed_ops += 1;
            return;
        }
        let to = candidates[self.rng.gen_range(0..candidates.len())].clone();
        let content = format!("Hello {} from {}", to, self.username);
        let result = self.engine.send_message(&self.username, &to, &content, None).await;
        if self.record(result).is_some() {
            self.messages_sent += 1;
        }
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.disconnected_until = self.current_action + self.rng.gen_range(5..=15);
        logging::log(
            "CLIENT",
            &format!("{} disconnected until action {}", self.username, self.disconnected_until),
        );
    }
}
