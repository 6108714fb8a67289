//! Seeds the engine with the admin account, the subreddit pool and the
//! simulated users before any client session starts.

use crate::config::Config;
use crate::zipf_subreddit_selection::ZipfSubredditSelector;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reddit_engine::{
    types::constants,
    utils::logging,
    Engine, EngineError, EngineHandle, EngineNode,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to register the admin account: {0}")]
    AdminRegistration(EngineError),
    #[error("Failed to create subreddit {name}: {source}")]
    SubredditCreation { name: String, source: EngineError },
    #[error("Failed to read the final engine state: {0}")]
    FinalState(EngineError),
}

/// Everything the driver needs after seeding
pub struct SetupOutcome {
    /// Handle bounded by the setup timeout
    pub engine: EngineHandle,
    /// `user_0 .. user_{n-1}`, in order
    pub usernames: Vec<String>,
    /// Subreddits each user joined, indexed like `usernames`
    pub memberships: Vec<Vec<String>>,
    /// Setup-time join count per subreddit
    pub popularity: HashMap<String, usize>,
}

/// Creates a progress bar, hidden unless progress output is enabled
pub fn progress_bar(len: u64, show: bool, unit: &str) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    let template = format!("[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {}", unit);
    if let Ok(style) = ProgressStyle::default_bar().template(&template) {
        bar.set_style(style.progress_chars("##-"));
    }
    bar
}

/// Spawns the engine and seeds it.
///
/// Admin and subreddit failures abort the run. A user whose registration
/// fails is still simulated; failed joins are simply not recorded.
pub async fn setup_engine(config: &Config) -> Result<SetupOutcome, SimulationError> {
    // The engine task exits once the driver and every client drop their handles
    let (engine, _) = EngineNode::spawn_with_capacity(config.engine.mailbox_capacity);
    let engine = engine.with_timeout(config.setup_timeout());
    let mut rng = match config.workload.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    engine
        .register_account(constants::ADMIN_USERNAME)
        .await
        .map_err(SimulationError::AdminRegistration)?;

    let subreddit_names: Vec<String> = (0..config.population.num_subreddits)
        .map(constants::subreddit_name)
        .collect();
    for name in &subreddit_names {
        engine
            .create_subreddit(constants::ADMIN_USERNAME, name)
            .await
            .map_err(|source| SimulationError::SubredditCreation {
                name: name.clone(),
                source,
            })?;
    }
    logging::log("SETUP", &format!("Created {} subreddits", subreddit_names.len()));

    let selector = ZipfSubredditSelector::new(subreddit_names);
    let num_users = config.population.num_users;
    let bar = progress_bar(num_users as u64, config.output.show_progress, "users");

    let mut usernames = Vec::with_capacity(num_users);
    let mut memberships = Vec::with_capacity(num_users);
    let mut popularity: HashMap<String, usize> = HashMap::new();

    for i in 0..num_users {
        let username = constants::username(i);
        if let Err(e) = engine.register_account(&username).await {
            logging::log("SETUP", &format!("Failed to register {}: {}", username, e));
        }

        let attempts = rng.gen_range(config.population.min_joins..=config.population.max_joins);
        let mut joined: Vec<String> = Vec::with_capacity(attempts);
        for _ in 0..attempts {
            let Some(subreddit) = selector.select(&mut rng) else {
                break;
            };
            if joined.iter().any(|s| s == subreddit) {
                continue;
            }
            match engine.join_subreddit(&username, subreddit).await {
                Ok(_) => {
                    *popularity.entry(subreddit.to_string()).or_insert(0) += 1;
                    joined.push(subreddit.to_string());
                }
                Err(e) => logging::log(
                    "SETUP",
                    &format!("{} failed to join {}: {}", username, subreddit, e),
                ),
            }
        }

        usernames.push(username);
        memberships.push(joined);
        bar.inc(1);
    }
    bar.finish_and_clear();
    logging::log("SETUP", &format!("Registered {} users", usernames.len()));

    Ok(SetupOutcome {
        engine,
        usernames,
        memberships,
        popularity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.population.num_users = 20;
        config.population.num_subreddits = 6;
        config.workload.seed = Some(9);
        config.output.show_progress = false;
        config
    }

    #[tokio::test]
    async fn test_setup_seeds_platform() {
        let config = small_config();
        let outcome = setup_engine(&config).await.expect("Setup failed");

        assert_eq!(outcome.usernames.len(), 20);
        assert_eq!(outcome.usernames[0], "user_0");

        let state = outcome.engine.get_state().await.unwrap();
        assert_eq!(state.accounts.len(), 21, "Users plus admin");
        assert_eq!(state.subreddits.len(), 6);
        for (username, joined) in outcome.usernames.iter().zip(&outcome.memberships) {
            assert!(!joined.is_empty() && joined.len() <= 5);
            assert_eq!(&state.accounts[username].joined_subreddits, joined);
        }

        let total_joins: usize = outcome.memberships.iter().map(Vec::len).sum();
        assert_eq!(outcome.popularity.values().sum::<usize>(), total_joins);
        for (subreddit, count) in &outcome.popularity {
            // The admin is a member of every subreddit it created
            assert_eq!(state.subreddits[subreddit].members.len(), *count + 1);
        }
    }

    #[tokio::test]
    async fn test_setup_is_reproducible_with_seed() {
        let config = small_config();
        let first = setup_engine(&config).await.unwrap();
        let second = setup_engine(&config).await.unwrap();
        assert_eq!(first.memberships, second.memberships);
    }
}
