//! The dispatch pipeline: greedy matching, rebalancing, consistency sweep.
//!
//! A [`DispatchEngine`] holds only configuration. Every solve builds its own
//! [`SolveState`] from the records it is handed and writes the outcome back
//! onto those same records, so concurrent solves on separate snapshots never
//! share mutable state.

use std::collections::HashSet;

use tracing::info;

use crate::error::{ConfigError, InputError};
use crate::matching::{run_greedy, scorer_for, CandidateScorer};
use crate::model::{Assignment, Driver, Restaurant, Snapshot};
use crate::params::EngineConfig;
use crate::rebalance::rebalance;
use crate::report::{assemble, Report, SolveDiagnostics};
use crate::spatial::is_valid_point;
use crate::state::SolveState;
use crate::validate::validate;

/// Result of one solve. The solved records themselves carry the same outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub assignments: Vec<Assignment>,
    pub diagnostics: SolveDiagnostics,
}

#[derive(Debug)]
pub struct DispatchEngine {
    config: EngineConfig,
    scorer: Box<dyn CandidateScorer>,
}

impl Default for DispatchEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let scorer = scorer_for(&config);
        Self { config, scorer }
    }
}

impl DispatchEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let scorer = scorer_for(&config);
        Self::with_scorer(config, scorer)
    }

    /// Build an engine around a custom scorer; `config.scorer` is ignored.
    pub fn with_scorer(
        config: EngineConfig,
        scorer: Box<dyn CandidateScorer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Solve a snapshot in place.
    ///
    /// On success every driver's `assigned_restaurant`/`orders_assigned` and
    /// every restaurant's `orders_count` reflect the outcome, and the same
    /// outcome is returned as a list of assignments. On error the snapshot is
    /// left untouched.
    pub fn solve(&self, snapshot: &mut Snapshot) -> Result<SolveOutcome, InputError> {
        self.solve_records(&mut snapshot.drivers, &mut snapshot.restaurants)
    }

    pub fn solve_records(
        &self,
        drivers: &mut [Driver],
        restaurants: &mut [Restaurant],
    ) -> Result<SolveOutcome, InputError> {
        let (outcome, _) = self.run(drivers, restaurants)?;
        Ok(outcome)
    }

    /// Solve a copy of `snapshot` and describe the result.
    ///
    /// The caller's snapshot is not modified; persisting the solved state is
    /// up to the caller.
    pub fn generate_report(&self, snapshot: &Snapshot) -> Result<Report, InputError> {
        let restaurants_before = snapshot.restaurants.clone();
        let mut after = snapshot.clone();
        let (outcome, state) = self.run(&mut after.drivers, &mut after.restaurants)?;
        Ok(assemble(
            restaurants_before,
            &after,
            state.matrix(),
            outcome.diagnostics,
        ))
    }

    fn run(
        &self,
        drivers: &mut [Driver],
        restaurants: &mut [Restaurant],
    ) -> Result<(SolveOutcome, SolveState), InputError> {
        check_input(drivers, restaurants)?;

        let mut state = SolveState::new(drivers, restaurants);
        let scorer = self.scorer.as_ref();

        let matched = run_greedy(&mut state, scorer, &self.config);
        let target = self
            .config
            .target_remaining(state.initial_total(), state.restaurant_count());
        let balance = rebalance(&mut state, scorer, &self.config, target);
        let validation = validate(&mut state, target);

        state.write_back(drivers, restaurants);
        let assignments = state.assignments(drivers, restaurants);

        info!(
            drivers = drivers.len(),
            restaurants = restaurants.len(),
            assigned = assignments.len(),
            picked = state.total_picked(),
            remaining = state.remaining_backlog(),
            target,
            transfers = balance.transfers,
            termination = ?balance.termination,
            "solve finished"
        );

        let diagnostics = SolveDiagnostics {
            target_remaining: target,
            greedy_matches: matched.drivers_matched,
            greedy_orders_picked: matched.orders_picked,
            greedy_drivers_skipped: matched.drivers_skipped,
            rebalance_iterations: balance.iterations,
            rebalance_transfers: balance.transfers,
            rebalance_orders_moved: balance.orders_moved,
            termination: balance.termination,
            validation,
        };
        Ok((
            SolveOutcome {
                assignments,
                diagnostics,
            },
            state,
        ))
    }
}

/// Reject records that would make the solve meaningless.
pub fn check_input(drivers: &[Driver], restaurants: &[Restaurant]) -> Result<(), InputError> {
    let mut driver_ids = HashSet::with_capacity(drivers.len());
    for driver in drivers {
        if !driver_ids.insert(driver.id) {
            return Err(InputError::DuplicateDriver(driver.id));
        }
        if driver.capacity == 0 {
            return Err(InputError::ZeroCapacity(driver.id));
        }
        if !is_valid_point(driver.position) {
            return Err(InputError::InvalidDriverPosition {
                id: driver.id,
                lat: driver.position.lat,
                lng: driver.position.lng,
            });
        }
        if driver.assigned_restaurant.is_some() || driver.orders_assigned != 0 {
            return Err(InputError::AlreadyAssigned(driver.id));
        }
    }

    let mut restaurant_ids = HashSet::with_capacity(restaurants.len());
    for restaurant in restaurants {
        if !restaurant_ids.insert(restaurant.id) {
            return Err(InputError::DuplicateRestaurant(restaurant.id));
        }
        if !is_valid_point(restaurant.position) {
            return Err(InputError::InvalidRestaurantPosition {
                id: restaurant.id,
                lat: restaurant.position.lat,
                lng: restaurant.position.lng,
            });
        }
    }
    Ok(())
}

/// Solve with the default engine, returning the assignments.
pub fn solve(
    drivers: &mut [Driver],
    restaurants: &mut [Restaurant],
) -> Result<Vec<Assignment>, InputError> {
    DispatchEngine::default()
        .solve_records(drivers, restaurants)
        .map(|outcome| outcome.assignments)
}

/// Build a report with the default engine.
pub fn generate_report(snapshot: &Snapshot) -> Result<Report, InputError> {
    DispatchEngine::default().generate_report(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoPoint;

    fn point() -> GeoPoint {
        GeoPoint::new(42.6966060, 23.3204766)
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut drivers = vec![Driver::new(7, "d", point(), 0)];
        let mut restaurants = vec![Restaurant::new(1, "r", point(), 3)];
        assert_eq!(
            solve(&mut drivers, &mut restaurants),
            Err(InputError::ZeroCapacity(crate::model::DriverId(7)))
        );
        assert_eq!(restaurants[0].orders_count, 3);
    }

    #[test]
    fn rejects_nan_coordinates() {
        let mut drivers = vec![Driver::new(1, "d", GeoPoint::new(f64::NAN, 0.0), 2)];
        let mut restaurants = vec![Restaurant::new(1, "r", point(), 3)];
        assert!(matches!(
            solve(&mut drivers, &mut restaurants),
            Err(InputError::InvalidDriverPosition { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_restaurants() {
        let mut drivers = vec![Driver::new(1, "d", point(), 2)];
        let mut restaurants = vec![
            Restaurant::new(4, "a", point(), 3),
            Restaurant::new(4, "b", point(), 3),
        ];
        assert_eq!(
            solve(&mut drivers, &mut restaurants),
            Err(InputError::DuplicateRestaurant(crate::model::RestaurantId(4)))
        );
    }

    #[test]
    fn rejects_pre_assigned_driver() {
        let mut snapshot = Snapshot::new(
            vec![Driver::new(1, "d", point(), 2)],
            vec![Restaurant::new(1, "r", point(), 5)],
        );
        let engine = DispatchEngine::default();
        engine.solve(&mut snapshot).expect("first solve");
        assert!(matches!(
            engine.solve(&mut snapshot),
            Err(InputError::AlreadyAssigned(_))
        ));

        snapshot.reset_assignments();
        assert!(engine.solve(&mut snapshot).is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig::default().with_max_orders_per_driver(0);
        assert!(DispatchEngine::new(config).is_err());
    }

    #[test]
    fn empty_snapshot_solves_to_nothing() {
        let mut snapshot = Snapshot::default();
        let outcome = DispatchEngine::default().solve(&mut snapshot).expect("solve");
        assert!(outcome.assignments.is_empty());
    }
}
