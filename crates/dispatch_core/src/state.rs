//! Indexed working state for one solve.
//!
//! Drivers and restaurants are addressed by their position in the input
//! slices. Backlogs and driver loads are held as signed integers so the
//! validator can detect and repair underflow instead of wrapping.

use crate::model::{Assignment, Driver, Restaurant};
use crate::spatial::DistanceMatrix;

/// Per-driver working record.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSlot {
    pub capacity: i64,
    pub restaurant: Option<usize>,
    pub orders: i64,
    /// Score of the restaurant the driver currently holds.
    pub score: f64,
}

impl DriverSlot {
    fn idle(capacity: u32) -> Self {
        Self {
            capacity: i64::from(capacity),
            restaurant: None,
            orders: 0,
            score: 0.0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.restaurant.is_some() && self.orders > 0
    }
}

/// A committed move of a driver from one restaurant to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    pub driver: usize,
    pub from: usize,
    pub to: usize,
    pub quantity: i64,
    /// Orders the driver no longer carries, handed back to `from`.
    pub returned: i64,
}

#[derive(Debug, Clone)]
pub struct SolveState {
    pub(crate) matrix: DistanceMatrix,
    pub(crate) backlog: Vec<i64>,
    pub(crate) drivers: Vec<DriverSlot>,
    initial_total: u64,
}

impl SolveState {
    pub fn new(drivers: &[Driver], restaurants: &[Restaurant]) -> Self {
        let backlog: Vec<i64> = restaurants
            .iter()
            .map(|restaurant| i64::from(restaurant.orders_count))
            .collect();
        let initial_total = restaurants
            .iter()
            .map(|restaurant| u64::from(restaurant.orders_count))
            .sum();
        Self {
            matrix: DistanceMatrix::build(drivers, restaurants),
            backlog,
            drivers: drivers
                .iter()
                .map(|driver| DriverSlot::idle(driver.capacity))
                .collect(),
            initial_total,
        }
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    pub fn backlog(&self, restaurant: usize) -> i64 {
        self.backlog[restaurant]
    }

    pub fn driver(&self, driver: usize) -> &DriverSlot {
        &self.drivers[driver]
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn restaurant_count(&self) -> usize {
        self.backlog.len()
    }

    /// Backlog across all restaurants when the solve started.
    pub fn initial_total(&self) -> u64 {
        self.initial_total
    }

    pub fn remaining_backlog(&self) -> i64 {
        self.backlog.iter().sum()
    }

    pub fn total_picked(&self) -> i64 {
        self.drivers.iter().map(|slot| slot.orders).sum()
    }

    /// Take `quantity` orders from `restaurant` for an idle driver.
    pub(crate) fn commit_pickup(
        &mut self,
        driver: usize,
        restaurant: usize,
        quantity: i64,
        score: f64,
    ) {
        debug_assert!(self.drivers[driver].restaurant.is_none());
        self.backlog[restaurant] -= quantity;
        let slot = &mut self.drivers[driver];
        slot.restaurant = Some(restaurant);
        slot.orders = quantity;
        slot.score = score;
    }

    /// Move a loaded driver to `to`, carrying `quantity` orders.
    ///
    /// Both sides change together: `quantity` units leave the driver's current
    /// restaurant and land on `to`, and whatever the driver carried beyond
    /// `quantity` is reversed back onto the restaurant it came from. Total
    /// orders (backlog plus carried) are unchanged.
    pub(crate) fn apply_transfer(
        &mut self,
        driver: usize,
        to: usize,
        quantity: i64,
        score: f64,
    ) -> Option<Transfer> {
        let slot = &self.drivers[driver];
        let from = slot.restaurant?;
        if quantity <= 0 || quantity > slot.orders || from == to {
            return None;
        }
        let returned = slot.orders - quantity;

        self.backlog[from] -= quantity;
        self.backlog[from] += returned;
        self.backlog[to] += quantity;

        let slot = &mut self.drivers[driver];
        slot.restaurant = Some(to);
        slot.orders = quantity;
        slot.score = score;

        Some(Transfer {
            driver,
            from,
            to,
            quantity,
            returned,
        })
    }

    /// Drop a driver's assignment without touching any backlog.
    pub(crate) fn release(&mut self, driver: usize) {
        let slot = &mut self.drivers[driver];
        slot.restaurant = None;
        slot.orders = 0;
        slot.score = 0.0;
    }

    /// Copy the final loads and backlogs onto the caller's records.
    ///
    /// Slices must be the ones the state was built from.
    pub fn write_back(&self, drivers: &mut [Driver], restaurants: &mut [Restaurant]) {
        for (restaurant, &count) in restaurants.iter_mut().zip(&self.backlog) {
            restaurant.orders_count = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
        }
        for (driver, slot) in drivers.iter_mut().zip(&self.drivers) {
            match slot.restaurant {
                Some(idx) if slot.is_loaded() => {
                    driver.assigned_restaurant = Some(restaurants[idx].id);
                    driver.orders_assigned = u32::try_from(slot.orders).unwrap_or(u32::MAX);
                }
                _ => driver.reset_assignment(),
            }
        }
    }

    /// One assignment per loaded driver, in driver input order.
    pub fn assignments(&self, drivers: &[Driver], restaurants: &[Restaurant]) -> Vec<Assignment> {
        self.drivers
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let restaurant = slot.restaurant.filter(|_| slot.is_loaded())?;
                Some(Assignment {
                    driver_id: drivers[idx].id,
                    restaurant_id: restaurants[restaurant].id,
                    quantity: u32::try_from(slot.orders).unwrap_or(u32::MAX),
                    distance_km: self.matrix.get(idx, restaurant),
                    score: slot.score,
                })
            })
            .collect()
    }
}
