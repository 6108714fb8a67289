use std::time::Duration;

/// Capacity of the engine mailbox
pub const ENGINE_MAILBOX_CAPACITY: usize = 1024;

/// Reply bound for requests issued during a client session
pub const ACTION_TIMEOUT: Duration = Duration::from_millis(100);

/// Reply bound for registration and joins issued while seeding the platform
pub const SETUP_TIMEOUT: Duration = Duration::from_millis(1000);

/// Reply bound suggested for a request/response wire layer
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Name of the account that creates the seeded subreddits
pub const ADMIN_USERNAME: &str = "admin";

/// Name of the seeded subreddit at popularity rank `index`
pub fn subreddit_name(index: usize) -> String {
    format!("subreddit_{}", index)
}

/// Name of the simulated user at position `index`
pub fn username(index: usize) -> String {
    format!("user_{}", index)
}
