use anyhow::Context;
use reddit_engine::utils::logging;
use simulator::{
    config::{Config, DEFAULT_CONFIG_PATH},
    run_simulation,
};
use std::env;

// ------------------------------------------------------------------------------------------------
// Main
// ------------------------------------------------------------------------------------------------

/// Loads the configuration, runs the simulation and saves its results
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::load()
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_PATH))?,
    };
    logging::log(
        "SIMULATOR",
        &format!(
            "Running {} users over {} subreddits, {} actions each",
            config.population.num_users,
            config.population.num_subreddits,
            config.workload.actions_per_user
        ),
    );

    let results = run_simulation(&config).await.context("Simulation failed")?;
    results.print_summary();
    println!(
        "Simulation finished: {} successful, {} failed operations, {:.2} ops/s",
        results.totals.successful_ops,
        results.totals.failed_ops,
        results.throughput()
    );

    if let Some(dir) = &config.output.results_dir {
        let path = results
            .save(dir)
            .with_context(|| format!("Failed to save results to {}", dir))?;
        println!("Results written to {}", path.display());
    }
    Ok(())
}
