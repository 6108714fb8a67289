use crate::client::ClientStats;
use crate::config::Config;
use crate::stats::SimulatorStats;
use chrono::{DateTime, Local};
use reddit_engine::{utils::logging, EngineState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Object counts taken from the final engine snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCounts {
    pub accounts: usize,
    pub subreddits: usize,
    pub posts: usize,
    pub comments: usize,
    pub messages: usize,
}

impl EngineCounts {
    pub fn from_state(state: &EngineState) -> Self {
        Self {
            accounts: state.accounts.len(),
            subreddits: state.subreddits.len(),
            posts: state.posts.len(),
            comments: state.comments.len(),
            messages: state.messages.len(),
        }
    }
}

/// Everything recorded about one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResults {
    pub start_time: DateTime<Local>,
    pub config: Config,
    pub totals: SimulatorStats,
    pub engine: EngineCounts,
    pub clients: Vec<ClientStats>,
    /// Subreddit join counts from setup
    pub popularity: Vec<(String, usize)>,
}

impl SimulationResults {
    pub fn throughput(&self) -> f64 {
        self.totals.throughput()
    }

    /// Writes `results.json` into `dir`, creating it if needed, and returns its path
    pub fn save(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join("results.json");
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(&path, json)?;
        logging::log("SIMULATOR", &format!("Results saved to {}", path.display()));
        Ok(path)
    }

    pub fn print_summary(&self) {
        self.totals.print_final_stats();
        logging::log(
            "SIMULATOR",
            &format!(
                "Engine holds {} accounts, {} subreddits, {} posts, {} comments, {} messages",
                self.engine.accounts,
                self.engine.subreddits,
                self.engine.posts,
                self.engine.comments,
                self.engine.messages
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_save_writes_results_json() {
        let clients = vec![ClientStats {
            username: "user_0".into(),
            reported: true,
            successful_ops: 3,
            ..ClientStats::default()
        }];
        let results = SimulationResults {
            start_time: Local::now(),
            config: Config::default(),
            totals: SimulatorStats::aggregate(&clients, Duration::from_secs(1)),
            engine: EngineCounts::default(),
            clients,
            popularity: vec![("subreddit_0".into(), 4)],
        };

        let dir = std::env::temp_dir().join(format!("reddit-sim-results-{}", std::process::id()));
        let path = results.save(&dir).expect("Failed to save results");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["totals"]["successful_ops"], 3);
        assert_eq!(written["clients"][0]["username"], "user_0");
        assert_eq!(written["config"]["population"]["num_users"], 150);
        fs::remove_dir_all(&dir).unwrap();
    }
}
