//! Spatial operations: great-circle distances and the per-solve distance matrix.
//!
//! This module provides:
//!
//! - **haversine_km / distance_km**: Haversine distance between two points
//! - **DistanceMatrix**: driver × restaurant distances computed once per solve
//!
//! Every component of a solve reads distances from the matrix; nothing
//! recomputes a pair mid-solve.

use crate::model::{Driver, GeoPoint, Restaurant};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two coordinates given in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lng1) = (lat1.to_radians(), lng1.to_radians());
    let (lat2, lng2) = (lat2.to_radians(), lng2.to_radians());
    // Absolute deltas keep the result bit-for-bit symmetric.
    let dlat = (lat2 - lat1).abs();
    let dlng = (lng2 - lng1).abs();
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlng = (dlng * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_km(a.lat, a.lng, b.lat, b.lng)
}

/// Whether a point is finite and inside the valid latitude/longitude ranges.
pub fn is_valid_point(point: GeoPoint) -> bool {
    point.lat.is_finite()
        && point.lng.is_finite()
        && (-90.0..=90.0).contains(&point.lat)
        && (-180.0..=180.0).contains(&point.lng)
}

/// Row-major driver × restaurant distance table.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    restaurants: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    pub fn build(drivers: &[Driver], restaurants: &[Restaurant]) -> Self {
        let mut cells = Vec::with_capacity(drivers.len() * restaurants.len());
        for driver in drivers {
            for restaurant in restaurants {
                cells.push(distance_km(driver.position, restaurant.position));
            }
        }
        Self {
            restaurants: restaurants.len(),
            cells,
        }
    }

    pub fn get(&self, driver_idx: usize, restaurant_idx: usize) -> f64 {
        debug_assert!(restaurant_idx < self.restaurants);
        self.cells[driver_idx * self.restaurants + restaurant_idx]
    }

    pub fn row(&self, driver_idx: usize) -> &[f64] {
        let start = driver_idx * self.restaurants;
        &self.cells[start..start + self.restaurants]
    }

    /// Nearest restaurant to a driver, ignoring backlog. Ties keep the first index.
    pub fn closest(&self, driver_idx: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (restaurant_idx, &distance) in self.row(driver_idx).iter().enumerate() {
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((restaurant_idx, distance)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        let p = GeoPoint::new(42.696606, 23.3204766);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(42.667122, 23.281657);
        let b = GeoPoint::new(42.713895, 23.264476);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn two_hundredths_of_latitude_is_about_2_22_km() {
        let a = GeoPoint::new(42.696606, 23.3204766);
        let b = GeoPoint::new(42.716606, 23.3204766);
        let d = distance_km(a, b);
        assert!((d - 2.2239).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn antipodal_points_are_finite() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-3);
    }

    #[test]
    fn rejects_out_of_range_points() {
        assert!(is_valid_point(GeoPoint::new(-90.0, 180.0)));
        assert!(!is_valid_point(GeoPoint::new(90.5, 0.0)));
        assert!(!is_valid_point(GeoPoint::new(0.0, f64::NAN)));
    }

    #[test]
    fn matrix_closest_keeps_first_on_ties() {
        let origin = GeoPoint::new(10.0, 10.0);
        let drivers = vec![Driver::new(1, "d", origin, 1)];
        let restaurants = vec![
            Restaurant::new(1, "far", GeoPoint::new(10.1, 10.0), 1),
            Restaurant::new(2, "here", origin, 1),
            Restaurant::new(3, "also here", origin, 1),
        ];
        let matrix = DistanceMatrix::build(&drivers, &restaurants);
        assert_eq!(matrix.closest(0), Some((1, 0.0)));
        assert_eq!(matrix.get(0, 2), 0.0);
    }
}
