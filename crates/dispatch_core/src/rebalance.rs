//! Bounded corrective passes that push every restaurant's remaining backlog
//! toward a shared target.
//!
//! Each pass finds restaurants well above the target ("high") and well below
//! it ("low"), and moves a single already-assigned driver from the most
//! over-stocked high restaurant it can find to the most depleted low one.
//! At most one transfer happens per pass. The loop stops when either side is
//! empty or no driver can be moved, and never runs more than
//! `max_rebalance_iterations` passes.

use std::cmp::Reverse;

use serde::Serialize;
use tracing::debug;

use crate::matching::CandidateScorer;
use crate::params::EngineConfig;
use crate::state::{SolveState, Transfer};

/// Why the rebalancing loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// No restaurant is outside the tolerance band on one of the two sides.
    Converged,
    /// Imbalance remains but no assigned driver can be moved.
    Stalled,
    /// The iteration cap was reached.
    IterationLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceOutcome {
    pub target: i64,
    pub iterations: u32,
    pub transfers: u32,
    pub orders_moved: i64,
    pub termination: Termination,
}

/// Restaurants above `target + tolerance`, most excess first.
fn high_restaurants(state: &SolveState, target: i64, tolerance: f64) -> Vec<usize> {
    let mut high: Vec<usize> = (0..state.restaurant_count())
        .filter(|&r| state.backlog(r) as f64 > target as f64 + tolerance)
        .collect();
    high.sort_by_key(|&r| Reverse(state.backlog(r)));
    high
}

/// Restaurants below `target - tolerance`, largest deficit first.
fn low_restaurants(state: &SolveState, target: i64, tolerance: f64) -> Vec<usize> {
    let mut low: Vec<usize> = (0..state.restaurant_count())
        .filter(|&r| (state.backlog(r) as f64) < target as f64 - tolerance)
        .collect();
    low.sort_by_key(|&r| state.backlog(r));
    low
}

/// First driver, in input order, currently carrying orders from `restaurant`.
fn loaded_driver_at(state: &SolveState, restaurant: usize) -> Option<usize> {
    (0..state.driver_count()).find(|&d| {
        let slot = state.driver(d);
        slot.is_loaded() && slot.restaurant == Some(restaurant)
    })
}

/// Try every (low, high) pair in priority order and apply the first feasible transfer.
fn transfer_once(
    state: &mut SolveState,
    scorer: &dyn CandidateScorer,
    target: i64,
    low: &[usize],
    high: &[usize],
) -> Option<Transfer> {
    for &to in low {
        for &from in high {
            let Some(driver) = loaded_driver_at(state, from) else {
                continue;
            };
            let excess = state.backlog(from) - target;
            let deficit = target - state.backlog(to);
            let quantity = state.driver(driver).orders.min(excess).min(deficit);
            if quantity <= 0 {
                continue;
            }
            let score = scorer.score(state.matrix().get(driver, to), state.backlog(to) + quantity);
            if let Some(transfer) = state.apply_transfer(driver, to, quantity, score) {
                return Some(transfer);
            }
        }
    }
    None
}

pub fn rebalance(
    state: &mut SolveState,
    scorer: &dyn CandidateScorer,
    config: &EngineConfig,
    target: i64,
) -> RebalanceOutcome {
    let tolerance = config.balance_tolerance;
    let mut outcome = RebalanceOutcome {
        target,
        iterations: 0,
        transfers: 0,
        orders_moved: 0,
        termination: Termination::IterationLimit,
    };

    for _ in 0..config.max_rebalance_iterations {
        let high = high_restaurants(state, target, tolerance);
        let low = low_restaurants(state, target, tolerance);
        if high.is_empty() || low.is_empty() {
            outcome.termination = Termination::Converged;
            return outcome;
        }

        outcome.iterations += 1;
        match transfer_once(state, scorer, target, &low, &high) {
            Some(transfer) => {
                debug!(
                    driver = transfer.driver,
                    from = transfer.from,
                    to = transfer.to,
                    quantity = transfer.quantity,
                    returned = transfer.returned,
                    "rebalanced driver"
                );
                outcome.transfers += 1;
                outcome.orders_moved += transfer.quantity;
            }
            None => {
                outcome.termination = Termination::Stalled;
                return outcome;
            }
        }
    }

    // The cap may land exactly on a balanced state.
    if high_restaurants(state, target, tolerance).is_empty()
        || low_restaurants(state, target, tolerance).is_empty()
    {
        outcome.termination = Termination::Converged;
    }
    outcome
}
