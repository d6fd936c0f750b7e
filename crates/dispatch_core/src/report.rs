//! Report assembly: before/after restaurant state, per-driver outcome and
//! aggregate statistics, read from the final state of a solve.

use serde::Serialize;

use crate::model::{DriverId, GeoPoint, Restaurant, RestaurantId, Snapshot};
use crate::rebalance::Termination;
use crate::spatial::DistanceMatrix;
use crate::validate::ValidationReport;

/// Title shown for drivers that did not get an assignment.
pub const UNASSIGNED_TITLE: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverReport {
    pub id: DriverId,
    pub name: String,
    pub position: GeoPoint,
    pub assigned_restaurant_id: Option<RestaurantId>,
    pub assigned_restaurant_title: String,
    pub distance_to_assigned: f64,
    pub orders_assigned: u32,
    pub capacity: u32,
    pub closest_restaurant_id: Option<RestaurantId>,
    pub closest_restaurant_title: Option<String>,
    pub distance_to_closest: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    pub total_drivers_assigned: usize,
    pub total_distance: f64,
    pub average_distance: f64,
    pub total_orders_assigned: u64,
    pub total_orders_remaining: u64,
    /// Orders picked up as a percentage of total driver capacity.
    pub utilization_rate: f64,
}

/// How the engine got to the final state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveDiagnostics {
    pub target_remaining: i64,
    pub greedy_matches: usize,
    pub greedy_orders_picked: i64,
    /// Drivers never considered because the backlog ran out first.
    pub greedy_drivers_skipped: usize,
    pub rebalance_iterations: u32,
    pub rebalance_transfers: u32,
    pub rebalance_orders_moved: i64,
    pub termination: Termination,
    pub validation: ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub restaurants_before: Vec<Restaurant>,
    pub restaurants_after: Vec<Restaurant>,
    pub drivers: Vec<DriverReport>,
    pub stats: ReportStats,
    pub diagnostics: SolveDiagnostics,
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn driver_report(
    after: &Snapshot,
    matrix: &DistanceMatrix,
    driver_idx: usize,
) -> DriverReport {
    let driver = &after.drivers[driver_idx];
    let assigned = driver
        .assigned_restaurant
        .filter(|_| driver.orders_assigned > 0)
        .and_then(|id| after.restaurants.iter().position(|r| r.id == id));
    let closest = matrix.closest(driver_idx);

    DriverReport {
        id: driver.id,
        name: driver.name.clone(),
        position: driver.position,
        assigned_restaurant_id: assigned.map(|idx| after.restaurants[idx].id),
        assigned_restaurant_title: assigned
            .map(|idx| after.restaurants[idx].title.clone())
            .unwrap_or_else(|| UNASSIGNED_TITLE.to_string()),
        distance_to_assigned: assigned.map_or(0.0, |idx| matrix.get(driver_idx, idx)),
        orders_assigned: if assigned.is_some() {
            driver.orders_assigned
        } else {
            0
        },
        capacity: driver.capacity,
        closest_restaurant_id: closest.map(|(idx, _)| after.restaurants[idx].id),
        closest_restaurant_title: closest.map(|(idx, _)| after.restaurants[idx].title.clone()),
        distance_to_closest: closest.map(|(_, distance)| distance),
    }
}

/// Summaries over assigned drivers only; averages of nothing are zero.
pub fn compute_stats(drivers: &[DriverReport], after: &Snapshot) -> ReportStats {
    let assigned: Vec<&DriverReport> = drivers
        .iter()
        .filter(|driver| driver.orders_assigned > 0)
        .collect();
    let total_distance: f64 = assigned.iter().map(|d| d.distance_to_assigned).sum();
    let total_orders_assigned: u64 = assigned.iter().map(|d| u64::from(d.orders_assigned)).sum();
    let average_distance = if assigned.is_empty() {
        0.0
    } else {
        total_distance / assigned.len() as f64
    };

    ReportStats {
        total_drivers_assigned: assigned.len(),
        total_distance,
        average_distance,
        total_orders_assigned,
        total_orders_remaining: after.total_backlog(),
        utilization_rate: percent(total_orders_assigned, after.total_capacity()),
    }
}

/// Join the pre-solve restaurants with the solved snapshot.
///
/// `matrix` must have been built from `after`'s drivers and restaurants in
/// the same order; positions never change during a solve, so the solve's own
/// matrix is reused here.
pub fn assemble(
    restaurants_before: Vec<Restaurant>,
    after: &Snapshot,
    matrix: &DistanceMatrix,
    diagnostics: SolveDiagnostics,
) -> Report {
    let drivers: Vec<DriverReport> = (0..after.drivers.len())
        .map(|idx| driver_report(after, matrix, idx))
        .collect();
    let stats = compute_stats(&drivers, after);

    Report {
        restaurants_before,
        restaurants_after: after.restaurants.clone(),
        drivers,
        stats,
        diagnostics,
    }
}
