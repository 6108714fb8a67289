//! Configuration loader and validator for the load-generation simulator.
//! Handles parsing, validation, and access to simulation configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Location of the configuration used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "simulator/config/config_simple.toml";

// ------------------------------------------------------------------------------------------------
// Main Configuration Structs
// ------------------------------------------------------------------------------------------------

/// Main configuration struct for simulation parameters.
///
/// The defaults reproduce the reference scenario: 150 users spread over 40
/// subreddits, each performing 30 randomized actions.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for the engine under test
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the engine mailbox
    pub mailbox_capacity: usize,
}

/// Configuration for the seeded platform.
///
/// Every user joins between `min_joins` and `max_joins` subreddits during
/// setup, picked with a Zipf bias toward the lowest-numbered subreddits.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of simulated users (and client actors)
    pub num_users: usize,
    /// Number of subreddits created by the admin account
    pub num_subreddits: usize,
    /// Fewest join attempts per user during setup
    pub min_joins: usize,
    /// Most join attempts per user during setup
    pub max_joins: usize,
}

/// Configuration for the client sessions
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Randomized actions each client performs
    pub actions_per_user: usize,
    /// Seed for reproducible runs; each client derives its own stream from it
    pub seed: Option<u64>,
}

/// Timeouts and waits, all in milliseconds
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    /// Reply bound for engine calls made during a session
    pub action_timeout_ms: u64,
    /// Reply bound for engine calls made while seeding
    pub setup_timeout_ms: u64,
    /// How long the driver waits after starting all clients
    pub settle_ms: u64,
    /// Reply bound for each client's stats report
    pub stats_timeout_ms: u64,
}

/// Configuration for result reporting
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory results are written to; nothing is written when unset
    pub results_dir: Option<String>,
    /// Whether to draw progress bars
    pub show_progress: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1024,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            num_users: 150,
            num_subreddits: 40,
            min_joins: 1,
            max_joins: 5,
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            actions_per_user: 30,
            seed: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            action_timeout_ms: 100,
            setup_timeout_ms: 1000,
            settle_ms: 5000,
            stats_timeout_ms: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: None,
            show_progress: true,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Error Types and Validation
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// ------------------------------------------------------------------------------------------------
// Configuration Implementation Methods
// ------------------------------------------------------------------------------------------------

impl Config {
    /// Load the configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.mailbox_capacity == 0 {
            return Err(ConfigError::ValidationError("Mailbox capacity must be positive".into()));
        }
        if self.population.num_users == 0 {
            return Err(ConfigError::ValidationError("Number of users must be positive".into()));
        }
        if self.population.num_subreddits == 0 {
            return Err(ConfigError::ValidationError(
                "Number of subreddits must be positive".into(),
            ));
        }
        if self.population.min_joins == 0 {
            return Err(ConfigError::ValidationError("Minimum joins must be positive".into()));
        }
        if self.population.max_joins < self.population.min_joins {
            return Err(ConfigError::ValidationError(
                "Maximum joins must not be below minimum joins".into(),
            ));
        }
        if self.timing.action_timeout_ms == 0 || self.timing.setup_timeout_ms == 0 {
            return Err(ConfigError::ValidationError("Timeouts must be positive".into()));
        }
        if self.timing.stats_timeout_ms == 0 {
            return Err(ConfigError::ValidationError("Stats timeout must be positive".into()));
        }
        Ok(())
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.timing.action_timeout_ms)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_millis(self.timing.setup_timeout_ms)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.timing.settle_ms)
    }

    pub fn stats_timeout(&self) -> Duration {
        Duration::from_millis(self.timing.stats_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scenario() {
        let config = Config::default();
        assert_eq!(config.population.num_users, 150);
        assert_eq!(config.population.num_subreddits, 40);
        assert_eq!(config.workload.actions_per_user, 30);
        assert_eq!(config.action_timeout(), Duration::from_millis(100));
        assert_eq!(config.setup_timeout(), Duration::from_millis(1000));
        config.validate().expect("Defaults should be valid");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = Config::from_toml(
            r#"
            [population]
            num_users = 10

            [workload]
            seed = 7
            "#,
        )
        .expect("Failed to parse config");
        assert_eq!(config.population.num_users, 10);
        assert_eq!(config.population.num_subreddits, 40);
        assert_eq!(config.workload.seed, Some(7));
        assert_eq!(config.workload.actions_per_user, 30);
    }

    #[test]
    fn test_invalid_join_range_is_rejected() {
        let result = Config::from_toml(
            r#"
            [population]
            min_joins = 4
            max_joins = 2
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
