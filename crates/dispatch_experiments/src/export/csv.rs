use dispatch_core::params::{AssignmentPolicy, ScorerKind};
use dispatch_core::rebalance::Termination;

use crate::metrics::SolveMetrics;
use crate::parameters::ParameterSet;

const HEADERS: [&str; 32] = [
    "experiment_id",
    "run_id",
    "seed",
    "num_drivers",
    "distance_weight",
    "order_weight",
    "max_orders_per_driver",
    "target_fraction",
    "max_rebalance_iterations",
    "assignment_policy",
    "scorer",
    "num_restaurants",
    "initial_orders",
    "drivers_assigned",
    "orders_assigned",
    "orders_remaining",
    "utilization_rate",
    "avg_distance_km",
    "median_distance_km",
    "p90_distance_km",
    "max_backlog_after",
    "min_backlog_after",
    "target_remaining",
    "greedy_matches",
    "greedy_orders_picked",
    "greedy_drivers_skipped",
    "rebalance_iterations",
    "rebalance_transfers",
    "rebalance_orders_moved",
    "termination",
    "corrected",
    "elapsed_ms",
];

fn policy_label(policy: AssignmentPolicy) -> &'static str {
    match policy {
        AssignmentPolicy::Greedy => "greedy",
        AssignmentPolicy::MandatoryMinimum => "mandatory_minimum",
    }
}

fn scorer_label(scorer: ScorerKind) -> &'static str {
    match scorer {
        ScorerKind::BacklogWeighted => "backlog_weighted",
        ScorerKind::Nearest => "nearest",
    }
}

fn termination_label(termination: Termination) -> &'static str {
    match termination {
        Termination::Converged => "converged",
        Termination::Stalled => "stalled",
        Termination::IterationLimit => "iteration_limit",
    }
}

pub(crate) fn export_to_csv_impl(
    results: &[SolveMetrics],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(HEADERS)?;

    for (result, param_set) in results.iter().zip(parameter_sets) {
        let engine = &param_set.engine;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            param_set.seed.to_string(),
            param_set.seed_params.num_drivers.to_string(),
            engine.distance_weight.to_string(),
            engine.order_weight.to_string(),
            engine.max_orders_per_driver.to_string(),
            engine.target_fraction.to_string(),
            engine.max_rebalance_iterations.to_string(),
            policy_label(engine.assignment_policy).to_string(),
            scorer_label(engine.scorer).to_string(),
            result.num_restaurants.to_string(),
            result.initial_orders.to_string(),
            result.drivers_assigned.to_string(),
            result.orders_assigned.to_string(),
            result.orders_remaining.to_string(),
            result.utilization_rate.to_string(),
            result.avg_distance_km.to_string(),
            result.median_distance_km.to_string(),
            result.p90_distance_km.to_string(),
            result.max_backlog_after.to_string(),
            result.min_backlog_after.to_string(),
            result.target_remaining.to_string(),
            result.greedy_matches.to_string(),
            result.greedy_orders_picked.to_string(),
            result.greedy_drivers_skipped.to_string(),
            result.rebalance_iterations.to_string(),
            result.rebalance_transfers.to_string(),
            result.rebalance_orders_moved.to_string(),
            termination_label(result.termination).to_string(),
            result.corrected.to_string(),
            result.elapsed_ms.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
