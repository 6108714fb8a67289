pub mod client;
pub mod config;
pub mod run_simulation;
pub mod setup;
pub mod simulation_results;
pub mod stats;
pub mod zipf_subreddit_selection;

pub use client::{ClientActor, ClientCommand, ClientHandle, ClientStats};
pub use run_simulation::run_simulation;
pub use setup::{setup_engine, SimulationError};
pub use simulation_results::SimulationResults;
pub use stats::SimulatorStats;
pub use zipf_subreddit_selection::ZipfSubredditSelector;
