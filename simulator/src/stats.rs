//! Aggregate statistics for a simulation run.
//! Sums the per-client counters and derives success rate and throughput.

use crate::client::ClientStats;
use reddit_engine::utils::logging;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ------------------------------------------------------------------------------------------------
// Statistics Tracking
// ------------------------------------------------------------------------------------------------

/// Totals across every client of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatorStats {
    /// Number of clients polled, reported or not
    pub clients: usize,
    /// Clients still inside a disconnect window when they reported
    pub disconnected_clients: usize,
    /// Clients represented by a zeroed placeholder
    pub unreported_clients: usize,
    pub actions_performed: usize,
    pub posts_created: u64,
    pub comments_created: u64,
    pub messages_sent: u64,
    pub successful_ops: u64,
    pub failed_ops: u64,
    /// Wall time from the first `Start` to the last stats report
    pub elapsed_seconds: f64,
}

impl SimulatorStats {
    /// Sums the counters of every client
    pub fn aggregate(clients: &[ClientStats], elapsed: Duration) -> Self {
        let mut stats = Self {
            clients: clients.len(),
            elapsed_seconds: elapsed.as_secs_f64(),
            ..Self::default()
        };
        for client in clients {
            if !client.reported {
                stats.unreported_clients += 1;
                continue;
            }
            if !client.connected {
                stats.disconnected_clients += 1;
            }
            stats.actions_performed += client.actions_performed;
            stats.posts_created += client.posts_created;
            stats.comments_created += client.comments_created;
            stats.messages_sent += client.messages_sent;
            stats.successful_ops += client.successful_ops;
            stats.failed_ops += client.failed_ops;
        }
        stats
    }

    pub fn total_ops(&self) -> u64 {
        self.successful_ops + self.failed_ops
    }

    /// Percentage of engine calls that succeeded, 0 when none were made
    pub fn success_rate(&self) -> f64 {
        if self.total_ops() > 0 {
            (self.successful_ops as f64 / self.total_ops() as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Successful operations per second of wall time
    pub fn throughput(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.successful_ops as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }

    /// Prints the final statistics including totals and rates
    pub fn print_final_stats(&self) {
        logging::log("SIMULATOR", "=== Final Statistics ===");
        logging::log("SIMULATOR", &format!("Duration: {:.2}s", self.elapsed_seconds));
        logging::log(
            "SIMULATOR",
            &format!(
                "Clients: {} ({} disconnected, {} unreported)",
                self.clients, self.disconnected_clients, self.unreported_clients
            ),
        );
        logging::log("SIMULATOR", &format!("Actions: {}", self.actions_performed));
        logging::log("SIMULATOR", &format!("Posts: {}", self.posts_created));
        logging::log("SIMULATOR", &format!("Comments: {}", self.comments_created));
        logging::log("SIMULATOR", &format!("Messages: {}", self.messages_sent));
        logging::log("SIMULATOR", &format!("Successful Operations: {}", self.successful_ops));
        logging::log("SIMULATOR", &format!("Failed Operations: {}", self.failed_ops));
        logging::log("SIMULATOR", &format!("Success Rate: {:.1}%", self.success_rate()));
        logging::log("SIMULATOR", &format!("Throughput: {:.2} ops/s", self.throughput()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(successful_ops: u64, failed_ops: u64, connected: bool) -> ClientStats {
        ClientStats {
            username: "user_0".into(),
            reported: true,
            connected,
            posts_created: 1,
            successful_ops,
            failed_ops,
            ..ClientStats::default()
        }
    }

    #[test]
    fn test_aggregate_sums_clients() {
        let stats = SimulatorStats::aggregate(
            &[client(6, 2, true), client(2, 0, false)],
            Duration::from_secs(2),
        );
        assert_eq!(stats.clients, 2);
        assert_eq!(stats.disconnected_clients, 1);
        assert_eq!(stats.posts_created, 2);
        assert_eq!(stats.total_ops(), 10);
        assert!((stats.success_rate() - 80.0).abs() < 1e-9);
        assert!((stats.throughput() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_placeholder_is_not_a_disconnect() {
        let placeholder = ClientStats {
            username: "user_1".into(),
            ..ClientStats::default()
        };
        let stats = SimulatorStats::aggregate(
            &[client(1, 0, true), placeholder],
            Duration::from_secs(1),
        );
        assert_eq!(stats.clients, 2);
        assert_eq!(stats.unreported_clients, 1);
        assert_eq!(stats.disconnected_clients, 0);
        assert_eq!(stats.posts_created, 1);
    }

    #[test]
    fn test_empty_run_has_zero_rates() {
        let stats = SimulatorStats::aggregate(&[], Duration::ZERO);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.throughput(), 0.0);
    }
}
