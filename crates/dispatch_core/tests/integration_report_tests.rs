mod support;

use dispatch_core::engine::{generate_report, DispatchEngine};
use dispatch_core::model::{RestaurantId, Snapshot};
use dispatch_core::report::UNASSIGNED_TITLE;
use dispatch_core::test_helpers::{drivers_on_point, restaurant_at, test_point};

use support::fixtures::{near_small_far_busy, seeded_snapshot};

#[test]
fn report_leaves_the_input_untouched() {
    let snapshot = near_small_far_busy(10);
    let before = snapshot.clone();

    let report = generate_report(&snapshot).expect("report");

    assert_eq!(snapshot, before);
    assert_eq!(report.restaurants_before, before.restaurants);
    assert_eq!(report.restaurants_after[1].orders_count, 16);
}

#[test]
fn report_compares_assigned_and_closest_restaurant() {
    let report = generate_report(&near_small_far_busy(10)).expect("report");

    let driver = &report.drivers[0];
    assert_eq!(driver.assigned_restaurant_id, Some(RestaurantId(2)));
    assert_eq!(driver.assigned_restaurant_title, "Restaurant 2");
    assert_eq!(driver.closest_restaurant_id, Some(RestaurantId(1)));
    assert_eq!(driver.distance_to_closest, Some(0.0));
    assert!(driver.distance_to_assigned > 2.0);
    assert_eq!(driver.orders_assigned, 4);
}

#[test]
fn idle_drivers_are_reported_as_unassigned() {
    let snapshot = Snapshot::new(drivers_on_point(2, 3), vec![restaurant_at(1, test_point(), 2)]);

    let report = generate_report(&snapshot).expect("report");

    let idle = &report.drivers[1];
    assert_eq!(idle.assigned_restaurant_id, None);
    assert_eq!(idle.assigned_restaurant_title, UNASSIGNED_TITLE);
    assert_eq!(idle.distance_to_assigned, 0.0);
    assert_eq!(idle.orders_assigned, 0);
    assert_eq!(report.stats.total_drivers_assigned, 1);
    assert_eq!(report.stats.total_orders_assigned, 2);
    assert_eq!(report.stats.total_orders_remaining, 0);
    // 2 picked out of 6 capacity
    assert!((report.stats.utilization_rate - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn empty_snapshot_reports_zeroes() {
    let report = generate_report(&Snapshot::default()).expect("report");

    assert!(report.drivers.is_empty());
    assert_eq!(report.stats.average_distance, 0.0);
    assert_eq!(report.stats.utilization_rate, 0.0);
}

#[test]
fn stats_match_the_solved_snapshot() {
    let engine = DispatchEngine::default();
    let snapshot = seeded_snapshot(42, 100);
    let report = engine.generate_report(&snapshot).expect("report");

    let mut solved = snapshot.clone();
    engine.solve(&mut solved).expect("solve");

    assert_eq!(report.restaurants_after, solved.restaurants);
    assert_eq!(report.stats.total_orders_assigned, solved.total_assigned());
    assert_eq!(report.stats.total_orders_remaining, solved.total_backlog());
    let assigned = solved.drivers.iter().filter(|d| d.is_assigned()).count();
    assert_eq!(report.stats.total_drivers_assigned, assigned);
    if assigned > 0 {
        let expected = report.stats.total_distance / assigned as f64;
        assert!((report.stats.average_distance - expected).abs() < 1e-9);
    }
}

#[test]
fn report_serializes_to_json() {
    let report = generate_report(&seeded_snapshot(3, 20)).expect("report");

    let json = serde_json::to_value(&report).expect("json");

    assert_eq!(json["drivers"].as_array().map(Vec::len), Some(20));
    assert_eq!(json["restaurants_before"].as_array().map(Vec::len), Some(10));
    assert!(json["stats"]["utilization_rate"].is_number());
    assert!(json["diagnostics"]["termination"].is_string());
}
