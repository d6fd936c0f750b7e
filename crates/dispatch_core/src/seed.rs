//! Demo data: randomized snapshots for dashboards, experiments and benches.
//!
//! Nothing here is used by a solve. Seeding produces a [`Snapshot`] with
//! fresh backlogs and drivers scattered around the restaurants; the engine
//! takes it from there.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Driver, GeoPoint, Restaurant, Snapshot};

/// Roughly how many kilometers one degree of latitude spans.
const KM_PER_DEGREE: f64 = 111.0;

/// Restaurant locations of the default demo city (Sofia, Bulgaria).
const SOFIA_RESTAURANTS: [(&str, f64, f64); 10] = [
    ("Happy Bukston", 42.667122, 23.281657),
    ("Happy Victoria", 42.688600, 23.308027),
    ("Happy South Park", 42.670071, 23.313399),
    ("Happy Budapeshta", 42.692017, 23.326259),
    ("Happy Mall Sofia", 42.6982608, 23.3078595),
    ("Happy Mladost", 42.6481687, 23.3793724),
    ("Happy Sveta Nedelya", 42.696606, 23.3204766),
    ("Happy Lyulin", 42.713895, 23.264476),
    ("Happy Paradise", 42.6570524, 23.3142243),
    ("Happy Iztok", 42.673136, 23.348732),
];

/// Parameters for generating a demo snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedParams {
    pub num_drivers: usize,
    pub min_orders: u32,
    pub max_orders: u32,
    pub min_capacity: u32,
    pub max_capacity: u32,
    /// Drivers spawn uniformly within this radius of a random restaurant.
    pub spawn_radius_km: f64,
    /// Seed for RNG (for reproducibility). `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            num_drivers: 100,
            min_orders: 5,
            max_orders: 50,
            min_capacity: 1,
            max_capacity: 4,
            spawn_radius_km: 5.0,
            seed: None,
        }
    }
}

impl SeedParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_num_drivers(mut self, num_drivers: usize) -> Self {
        self.num_drivers = num_drivers;
        self
    }

    pub fn with_orders_range(mut self, min: u32, max: u32) -> Self {
        self.min_orders = min;
        self.max_orders = max;
        self
    }

    pub fn with_capacity_range(mut self, min: u32, max: u32) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_orders > self.max_orders {
            return Err(ConfigError::EmptyRange {
                name: "orders",
                min: self.min_orders,
                max: self.max_orders,
            });
        }
        if self.min_capacity > self.max_capacity {
            return Err(ConfigError::EmptyRange {
                name: "capacity",
                min: self.min_capacity,
                max: self.max_capacity,
            });
        }
        if self.min_capacity == 0 {
            return Err(ConfigError::ZeroMinCapacity);
        }
        if !(self.spawn_radius_km.is_finite() && self.spawn_radius_km >= 0.0) {
            return Err(ConfigError::InvalidWeight {
                name: "spawn_radius_km",
                value: self.spawn_radius_km,
            });
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// The demo restaurants with an empty backlog.
pub fn sofia_restaurants() -> Vec<Restaurant> {
    SOFIA_RESTAURANTS
        .iter()
        .enumerate()
        .map(|(idx, &(title, lat, lng))| {
            Restaurant::new(idx as u64 + 1, title, GeoPoint::new(lat, lng), 0)
        })
        .collect()
}

/// Uniform random point inside a disk of `max_km` around `center`.
///
/// Degrees are treated as a flat 111 km grid, which is close enough at city
/// scale.
pub fn random_point_near<R: Rng>(rng: &mut R, center: GeoPoint, max_km: f64) -> GeoPoint {
    let radius = max_km / KM_PER_DEGREE;
    let u: f64 = rng.gen();
    let v: f64 = rng.gen();
    let w = radius * u.sqrt();
    let t = 2.0 * PI * v;
    GeoPoint::new(center.lat + w * t.cos(), center.lng + w * t.sin())
}

/// Draw new backlogs and new driver positions/capacities, clearing assignments.
///
/// Every driver is placed near a randomly chosen restaurant. With no
/// restaurants the drivers keep their positions.
pub fn randomize<R: Rng>(snapshot: &mut Snapshot, params: &SeedParams, rng: &mut R) {
    for restaurant in &mut snapshot.restaurants {
        restaurant.orders_count = rng.gen_range(params.min_orders..=params.max_orders);
    }

    let anchors: Vec<GeoPoint> = snapshot
        .restaurants
        .iter()
        .map(|restaurant| restaurant.position)
        .collect();
    for driver in &mut snapshot.drivers {
        if let Some(&anchor) = anchors.choose(rng) {
            driver.position = random_point_near(rng, anchor, params.spawn_radius_km);
        }
        driver.capacity = rng.gen_range(params.min_capacity..=params.max_capacity);
        driver.reset_assignment();
    }
}

/// Build a randomized snapshot around the given restaurants.
pub fn generate_snapshot_with(
    restaurants: Vec<Restaurant>,
    params: &SeedParams,
) -> Result<Snapshot, ConfigError> {
    params.validate()?;
    if restaurants.is_empty() {
        return Err(ConfigError::NoRestaurants);
    }
    let drivers = (1..=params.num_drivers)
        .map(|i| Driver::new(i as u64, format!("Driver {i}"), GeoPoint::new(0.0, 0.0), 1))
        .collect();
    let mut snapshot = Snapshot::new(drivers, restaurants);
    let mut rng = params.rng();
    randomize(&mut snapshot, params, &mut rng);
    Ok(snapshot)
}

/// Build a randomized snapshot of the demo city.
pub fn generate_snapshot(params: &SeedParams) -> Result<Snapshot, ConfigError> {
    generate_snapshot_with(sofia_restaurants(), params)
}
