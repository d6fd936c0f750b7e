//! Metrics extraction from solve results.

use dispatch_core::engine::SolveOutcome;
use dispatch_core::model::Snapshot;
use dispatch_core::rebalance::Termination;
use serde::Serialize;

/// Aggregated metrics from a single solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveMetrics {
    pub num_drivers: usize,
    pub num_restaurants: usize,
    /// Backlog across all restaurants before the solve.
    pub initial_orders: u64,
    pub drivers_assigned: usize,
    pub orders_assigned: u64,
    pub orders_remaining: u64,
    /// Orders picked up as a percentage of total driver capacity.
    pub utilization_rate: f64,
    pub avg_distance_km: f64,
    pub median_distance_km: f64,
    pub p90_distance_km: f64,
    /// Largest and smallest remaining restaurant backlog.
    pub max_backlog_after: u32,
    pub min_backlog_after: u32,
    pub target_remaining: i64,
    pub greedy_matches: usize,
    pub greedy_orders_picked: i64,
    pub greedy_drivers_skipped: usize,
    pub rebalance_iterations: u32,
    pub rebalance_transfers: u32,
    pub rebalance_orders_moved: i64,
    pub termination: Termination,
    /// Whether the consistency sweep had to correct anything.
    pub corrected: bool,
    pub elapsed_ms: f64,
}

impl SolveMetrics {
    /// Average, median and P90 of `values`; zeros when empty.
    fn calculate_stats(values: &[f64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let avg = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        } else {
            sorted[sorted.len() / 2]
        };
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)];

        (avg, median, p90)
    }
}

/// Summarize one solve from the snapshot before it, the solved snapshot and
/// the engine's outcome.
pub fn extract_metrics(
    before: &Snapshot,
    after: &Snapshot,
    outcome: &SolveOutcome,
    elapsed_ms: f64,
) -> SolveMetrics {
    let distances: Vec<f64> = outcome
        .assignments
        .iter()
        .map(|assignment| assignment.distance_km)
        .collect();
    let (avg_distance_km, median_distance_km, p90_distance_km) =
        SolveMetrics::calculate_stats(&distances);

    let orders_assigned = after.total_assigned();
    let capacity = after.total_capacity();
    let utilization_rate = if capacity == 0 {
        0.0
    } else {
        orders_assigned as f64 / capacity as f64 * 100.0
    };
    let backlogs = after.restaurants.iter().map(|r| r.orders_count);
    let diagnostics = &outcome.diagnostics;

    SolveMetrics {
        num_drivers: after.drivers.len(),
        num_restaurants: after.restaurants.len(),
        initial_orders: before.total_backlog(),
        drivers_assigned: outcome.assignments.len(),
        orders_assigned,
        orders_remaining: after.total_backlog(),
        utilization_rate,
        avg_distance_km,
        median_distance_km,
        p90_distance_km,
        max_backlog_after: backlogs.clone().max().unwrap_or(0),
        min_backlog_after: backlogs.min().unwrap_or(0),
        target_remaining: diagnostics.target_remaining,
        greedy_matches: diagnostics.greedy_matches,
        greedy_orders_picked: diagnostics.greedy_orders_picked,
        greedy_drivers_skipped: diagnostics.greedy_drivers_skipped,
        rebalance_iterations: diagnostics.rebalance_iterations,
        rebalance_transfers: diagnostics.rebalance_transfers,
        rebalance_orders_moved: diagnostics.rebalance_orders_moved,
        termination: diagnostics.termination,
        corrected: !diagnostics.validation.is_clean(),
        elapsed_ms,
    }
}
