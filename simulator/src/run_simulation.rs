use crate::client::{ClientActor, ClientHandle, ClientSetup, ClientStats};
use crate::config::Config;
use crate::setup::{progress_bar, setup_engine, SimulationError};
use crate::simulation_results::{EngineCounts, SimulationResults};
use crate::stats::SimulatorStats;
use chrono::Local;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reddit_engine::{utils::logging, Engine};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;

// ------------------------------------------------------------------------------------------------
// Main Simulation Function
// ------------------------------------------------------------------------------------------------

/// Runs one simulation end to end.
///
/// Seeds the engine, starts one client actor per user, lets them run for
/// the settling period and then collects every client's counters together
/// with the final engine snapshot.
pub async fn run_simulation(config: &Config) -> Result<SimulationResults, SimulationError> {
    let start_time = Local::now();
    let setup = setup_engine(config).await?;

    let known_usernames = Arc::new(setup.usernames.clone());
    let popularity = Arc::new(setup.popularity.clone());
    let session_engine = setup.engine.with_timeout(config.action_timeout());

    let mut clients: Vec<ClientHandle> = Vec::with_capacity(setup.usernames.len());
    for (i, (username, subreddits)) in setup.usernames.iter().zip(&setup.memberships).enumerate() {
        let rng = match config.workload.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64 + 1)),
            None => StdRng::from_entropy(),
        };
        let client_setup = ClientSetup {
            username: username.clone(),
            subreddits: subreddits.clone(),
            known_usernames: known_usernames.clone(),
            popularity: popularity.clone(),
            num_subreddits: config.population.num_subreddits,
        };
        let (handle, _join) = ClientActor::spawn(client_setup, session_engine.clone(), rng);
        clients.push(handle);
    }
    drop(session_engine);

    let started = Instant::now();
    for client in &clients {
        if !client.start(config.workload.actions_per_user).await {
            logging::log(
                "SIMULATOR",
                &format!("Client {} stopped before starting", client.username()),
            );
        }
    }
    logging::log(
        "SIMULATOR",
        &format!("Started {} clients, settling for {:?}", clients.len(), config.settle_duration()),
    );
    sleep(config.settle_duration()).await;

    let client_stats = collect_stats(&clients, config).await;
    let elapsed = started.elapsed();

    let state = setup.engine.get_state().await.map_err(SimulationError::FinalState)?;
    let totals = SimulatorStats::aggregate(&client_stats, elapsed);
    logging::log("SIMULATOR", &format!("Throughput: {:.2} ops/s", totals.throughput()));

    let mut popularity: Vec<(String, usize)> = setup.popularity.into_iter().collect();
    popularity.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(SimulationResults {
        start_time,
        config: config.clone(),
        totals,
        engine: EngineCounts::from_state(&state),
        clients: client_stats,
        popularity,
    })
}

/// Polls every client concurrently, substituting zeroed stats for clients
/// that do not answer within the stats timeout
async fn collect_stats(clients: &[ClientHandle], config: &Config) -> Vec<ClientStats> {
    let bar = progress_bar(clients.len() as u64, config.output.show_progress, "clients reported");
    let wait = config.stats_timeout();
    let reports = clients.iter().map(|client| {
        let bar = bar.clone();
        async move {
            let stats = match client.report_stats(wait).await {
                Some(stats) => stats,
                None => {
                    logging::log("SIMULATOR", &format!("No stats from {}", client.username()));
                    ClientStats {
                        username: client.username().to_string(),
                        ..ClientStats::default()
                    }
                }
            };
            bar.inc(1);
            stats
        }
    });
    let stats = join_all(reports).await;
    bar.finish_and_clear();
    stats
}
