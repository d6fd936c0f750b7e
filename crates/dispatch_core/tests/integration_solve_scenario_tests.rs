mod support;

use dispatch_core::engine::{solve, DispatchEngine};
use dispatch_core::model::{RestaurantId, Snapshot};
use dispatch_core::params::{AssignmentPolicy, EngineConfig};
use dispatch_core::rebalance::Termination;
use dispatch_core::test_helpers::{driver_at, drivers_on_point, restaurant_at, test_point};

use support::fixtures::near_small_far_busy;
use support::invariants::assert_solved_consistently;

#[test]
fn single_driver_takes_its_capacity() {
    let mut drivers = vec![driver_at(1, test_point(), 3)];
    let mut restaurants = vec![restaurant_at(1, test_point(), 10)];

    let assignments = solve(&mut drivers, &mut restaurants).expect("solve");

    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].quantity, 3);
    assert_eq!(assignments[0].distance_km, 0.0);
    assert_eq!(restaurants[0].orders_count, 7);
    assert_eq!(drivers[0].assigned_restaurant, Some(RestaurantId(1)));
    assert_eq!(drivers[0].orders_assigned, 3);
}

#[test]
fn busy_restaurant_outranks_nearby_one() {
    let mut snapshot = near_small_far_busy(10);

    let outcome = DispatchEngine::default().solve(&mut snapshot).expect("solve");

    assert_eq!(outcome.assignments.len(), 1);
    let assignment = &outcome.assignments[0];
    assert_eq!(assignment.restaurant_id, RestaurantId(2));
    assert_eq!(assignment.quantity, 4);
    assert!((assignment.distance_km - 2.2239).abs() < 1e-3);
    assert!((assignment.score - (assignment.distance_km - 10.0)).abs() < 1e-9);
    assert_eq!(snapshot.restaurants[0].orders_count, 2);
    assert_eq!(snapshot.restaurants[1].orders_count, 16);
    assert_eq!(outcome.diagnostics.target_remaining, 2);
    assert_eq!(outcome.diagnostics.termination, Termination::Converged);
}

#[test]
fn scarce_backlog_leaves_second_driver_idle() {
    let mut snapshot = Snapshot::new(
        drivers_on_point(2, 3),
        vec![restaurant_at(1, test_point(), 2)],
    );

    let outcome = DispatchEngine::default().solve(&mut snapshot).expect("solve");

    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.assignments[0].quantity, 2);
    assert_eq!(snapshot.restaurants[0].orders_count, 0);
    assert!(snapshot.drivers[0].is_assigned());
    assert!(!snapshot.drivers[1].is_assigned());
    assert_eq!(outcome.diagnostics.greedy_matches, 1);
    assert_eq!(outcome.diagnostics.greedy_orders_picked, 2);
    assert_eq!(outcome.diagnostics.greedy_drivers_skipped, 1);
}

#[test]
fn mandatory_minimum_spreads_scarce_backlog() {
    let mut snapshot = Snapshot::new(
        drivers_on_point(2, 3),
        vec![restaurant_at(1, test_point(), 2)],
    );
    let config = EngineConfig::default().with_assignment_policy(AssignmentPolicy::MandatoryMinimum);
    let engine = DispatchEngine::new(config).expect("engine");

    let outcome = engine.solve(&mut snapshot).expect("solve");

    let quantities: Vec<u32> = outcome.assignments.iter().map(|a| a.quantity).collect();
    assert_eq!(quantities, vec![1, 1]);
    assert_eq!(snapshot.restaurants[0].orders_count, 0);
    assert_solved_consistently(&snapshot, &outcome.assignments, 4);
}

#[test]
fn no_backlog_means_no_assignments() {
    let mut snapshot = Snapshot::new(
        drivers_on_point(3, 4),
        vec![restaurant_at(1, test_point(), 0)],
    );

    let outcome = DispatchEngine::default().solve(&mut snapshot).expect("solve");

    assert!(outcome.assignments.is_empty());
    assert!(snapshot.drivers.iter().all(|d| !d.is_assigned()));
}

#[test]
fn drivers_without_restaurants_stay_idle() {
    let mut snapshot = Snapshot::new(drivers_on_point(2, 4), Vec::new());

    let outcome = DispatchEngine::default().solve(&mut snapshot).expect("solve");

    assert!(outcome.assignments.is_empty());
    assert_eq!(outcome.diagnostics.target_remaining, 2);
}
