use thiserror::Error;

use crate::model::{DriverId, RestaurantId};

/// Caller contract violations detected before a solve starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("driver {0:?} has zero capacity")]
    ZeroCapacity(DriverId),
    #[error("driver {id:?} has invalid position ({lat}, {lng})")]
    InvalidDriverPosition { id: DriverId, lat: f64, lng: f64 },
    #[error("restaurant {id:?} has invalid position ({lat}, {lng})")]
    InvalidRestaurantPosition { id: RestaurantId, lat: f64, lng: f64 },
    #[error("driver id {0:?} appears more than once")]
    DuplicateDriver(DriverId),
    #[error("restaurant id {0:?} appears more than once")]
    DuplicateRestaurant(RestaurantId),
    #[error("driver {0:?} is already assigned; reset assignments before solving")]
    AlreadyAssigned(DriverId),
}

/// Engine or seed configuration values outside their valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("max_orders_per_driver must be at least 1")]
    ZeroOrdersPerDriver,
    #[error("target_fraction must be within [0, 1], got {0}")]
    TargetFractionOutOfRange(f64),
    #[error("{name} range is empty: {min} > {max}")]
    EmptyRange { name: &'static str, min: u32, max: u32 },
    #[error("min_capacity must be at least 1")]
    ZeroMinCapacity,
    #[error("seed params need at least one restaurant")]
    NoRestaurants,
}
