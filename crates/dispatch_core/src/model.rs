use serde::{Deserialize, Serialize};

/// Stable driver identifier, unique within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub u64);

/// Stable restaurant identifier, unique within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub u64);

/// Geographic point in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub position: GeoPoint,
    /// Maximum number of orders the driver can carry at once.
    pub capacity: u32,
    /// Restaurant the driver heads to next; `None` while unassigned.
    #[serde(default)]
    pub assigned_restaurant: Option<RestaurantId>,
    #[serde(default)]
    pub orders_assigned: u32,
}

impl Driver {
    pub fn new(id: u64, name: impl Into<String>, position: GeoPoint, capacity: u32) -> Self {
        Self {
            id: DriverId(id),
            name: name.into(),
            position,
            capacity,
            assigned_restaurant: None,
            orders_assigned: 0,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_restaurant.is_some() && self.orders_assigned > 0
    }

    /// Clear any assignment left over from a previous solve.
    pub fn reset_assignment(&mut self) {
        self.assigned_restaurant = None;
        self.orders_assigned = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub title: String,
    pub position: GeoPoint,
    /// Pending orders awaiting pickup (the backlog).
    pub orders_count: u32,
}

impl Restaurant {
    pub fn new(id: u64, title: impl Into<String>, position: GeoPoint, orders_count: u32) -> Self {
        Self {
            id: RestaurantId(id),
            title: title.into(),
            position,
            orders_count,
        }
    }
}

/// One driver's pickup produced by a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub driver_id: DriverId,
    pub restaurant_id: RestaurantId,
    pub quantity: u32,
    pub distance_km: f64,
    pub score: f64,
}

/// Drivers and restaurants handed to a single solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub drivers: Vec<Driver>,
    pub restaurants: Vec<Restaurant>,
}

impl Snapshot {
    pub fn new(drivers: Vec<Driver>, restaurants: Vec<Restaurant>) -> Self {
        Self {
            drivers,
            restaurants,
        }
    }

    pub fn total_backlog(&self) -> u64 {
        self.restaurants
            .iter()
            .map(|restaurant| u64::from(restaurant.orders_count))
            .sum()
    }

    pub fn total_assigned(&self) -> u64 {
        self.drivers
            .iter()
            .map(|driver| u64::from(driver.orders_assigned))
            .sum()
    }

    pub fn total_capacity(&self) -> u64 {
        self.drivers
            .iter()
            .map(|driver| u64::from(driver.capacity))
            .sum()
    }

    pub fn restaurant(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| restaurant.id == id)
    }

    /// Put every driver back into the unassigned state.
    pub fn reset_assignments(&mut self) {
        for driver in &mut self.drivers {
            driver.reset_assignment();
        }
    }
}
