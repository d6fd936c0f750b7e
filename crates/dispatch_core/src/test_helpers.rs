//! Test helpers for common test setup and utilities.
//!
//! Fixtures are placed around one fixed point in central Sofia so every test
//! reuses the same geography.

use crate::model::{Driver, GeoPoint, Restaurant, Snapshot};

/// Latitude of the shared test point.
pub const TEST_LAT: f64 = 42.696606;
/// Longitude of the shared test point.
pub const TEST_LNG: f64 = 23.3204766;

/// The shared test point.
pub fn test_point() -> GeoPoint {
    GeoPoint::new(TEST_LAT, TEST_LNG)
}

/// A point `dlat` degrees north of the test point.
///
/// Along a meridian one hundredth of a degree is about 1.112 km.
pub fn point_north(dlat: f64) -> GeoPoint {
    GeoPoint::new(TEST_LAT + dlat, TEST_LNG)
}

pub fn driver_at(id: u64, position: GeoPoint, capacity: u32) -> Driver {
    Driver::new(id, format!("Driver {id}"), position, capacity)
}

pub fn restaurant_at(id: u64, position: GeoPoint, orders: u32) -> Restaurant {
    Restaurant::new(id, format!("Restaurant {id}"), position, orders)
}

/// `count` drivers with the given capacity, all on the test point.
pub fn drivers_on_point(count: u64, capacity: u32) -> Vec<Driver> {
    (1..=count)
        .map(|id| driver_at(id, test_point(), capacity))
        .collect()
}

/// Orders still pending plus orders carried by drivers.
pub fn orders_in_system(snapshot: &Snapshot) -> u64 {
    snapshot.total_backlog() + snapshot.total_assigned()
}
