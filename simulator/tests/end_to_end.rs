use simulator::{config::Config, run_simulation};

/// Reference scenario with timeouts generous enough that no request is
/// abandoned, so every created object is counted by exactly one client
fn reference_config() -> Config {
    let mut config = Config::default();
    config.workload.seed = Some(2024);
    config.timing.action_timeout_ms = 10_000;
    config.timing.setup_timeout_ms = 10_000;
    config.timing.settle_ms = 200;
    config.timing.stats_timeout_ms = 60_000;
    config.output.show_progress = false;
    config
}

/// Tests that the engine's final object counts match what the clients report
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reference_scenario_counts_match() {
    let config = reference_config();
    let results = run_simulation(&config).await.expect("Simulation failed");

    assert_eq!(results.clients.len(), 150);
    assert_eq!(results.totals.unreported_clients, 0);
    assert_eq!(results.engine.accounts, 151, "150 users plus admin");
    assert_eq!(results.engine.subreddits, 40);

    let posts: u64 = results.clients.iter().map(|c| c.posts_created).sum();
    let comments: u64 = results.clients.iter().map(|c| c.comments_created).sum();
    let messages: u64 = results.clients.iter().map(|c| c.messages_sent).sum();
    assert_eq!(results.engine.posts as u64, posts);
    assert_eq!(results.engine.comments as u64, comments);
    assert_eq!(results.engine.messages as u64, messages);

    for client in &results.clients {
        assert_eq!(client.actions_performed, 30, "{} did not finish its session", client.username);
        assert!(!client.subreddits.is_empty());
    }
    assert!(results.totals.successful_ops > 0);
    assert!(results.throughput() > 0.0);
}

/// Tests that popularity reflects the setup-time Zipf bias
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_popularity_favours_low_ranks() {
    let config = reference_config();
    let results = run_simulation(&config).await.expect("Simulation failed");

    let count = |name: &str| {
        results
            .popularity
            .iter()
            .find(|(subreddit, _)| subreddit == name)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    };
    assert!(count("subreddit_0") > count("subreddit_39"));
    assert_eq!(results.popularity[0].0, "subreddit_0");
}
