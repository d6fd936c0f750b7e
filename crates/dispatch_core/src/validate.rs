use serde::Serialize;
use tracing::warn;

use crate::state::SolveState;

/// Corrections made by the final consistency sweep. All zero on a healthy solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub capacity_clamps: u32,
    pub orders_returned: i64,
    pub backlog_clamps: u32,
    pub released_drivers: u32,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Enforce `0 <= orders <= capacity` per driver and `backlog >= 0` per restaurant.
///
/// Over-capacity drivers are clamped and the excess goes back to the
/// restaurant they are assigned to. Negative backlogs are reset to `target`.
/// Drivers holding a restaurant but no orders are released. Running it on an
/// already valid state changes nothing.
pub fn validate(state: &mut SolveState, target: i64) -> ValidationReport {
    let mut report = ValidationReport::default();

    for driver in 0..state.drivers.len() {
        let slot = &mut state.drivers[driver];
        if slot.orders > slot.capacity {
            let excess = slot.orders - slot.capacity;
            slot.orders = slot.capacity;
            if let Some(restaurant) = slot.restaurant {
                state.backlog[restaurant] += excess;
            }
            report.capacity_clamps += 1;
            report.orders_returned += excess;
        }
    }

    for count in state.backlog.iter_mut() {
        if *count < 0 {
            *count = target;
            report.backlog_clamps += 1;
        }
    }

    for driver in 0..state.drivers.len() {
        let slot = &state.drivers[driver];
        let stray = (slot.restaurant.is_some() && slot.orders <= 0)
            || (slot.restaurant.is_none() && slot.orders != 0);
        if stray {
            state.release(driver);
            report.released_drivers += 1;
        }
    }

    if !report.is_clean() {
        warn!(
            capacity_clamps = report.capacity_clamps,
            orders_returned = report.orders_returned,
            backlog_clamps = report.backlog_clamps,
            released_drivers = report.released_drivers,
            "consistency sweep corrected solve state"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Driver, GeoPoint, Restaurant};

    fn state() -> SolveState {
        let p = GeoPoint::new(42.69, 23.32);
        let drivers = vec![Driver::new(1, "a", p, 2), Driver::new(2, "b", p, 3)];
        let restaurants = vec![Restaurant::new(1, "r1", p, 10), Restaurant::new(2, "r2", p, 1)];
        SolveState::new(&drivers, &restaurants)
    }

    #[test]
    fn clamps_overloaded_driver_and_returns_excess() {
        let mut state = state();
        state.commit_pickup(0, 0, 5, 0.0);

        let report = validate(&mut state, 2);

        assert_eq!(report.capacity_clamps, 1);
        assert_eq!(report.orders_returned, 3);
        assert_eq!(state.driver(0).orders, 2);
        assert_eq!(state.backlog(0), 8);
    }

    #[test]
    fn negative_backlog_is_reset_to_target() {
        let mut state = state();
        state.backlog[1] = -4;

        let report = validate(&mut state, 2);

        assert_eq!(report.backlog_clamps, 1);
        assert_eq!(state.backlog(1), 2);
    }

    #[test]
    fn releases_drivers_holding_nothing() {
        let mut state = state();
        state.commit_pickup(1, 1, 0, 0.0);

        let report = validate(&mut state, 2);

        assert_eq!(report.released_drivers, 1);
        assert_eq!(state.driver(1).restaurant, None);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut state = state();
        state.commit_pickup(0, 0, 7, 0.0);
        state.backlog[1] = -1;

        let first = validate(&mut state, 2);
        let snapshot = (state.backlog.clone(), state.drivers.clone());
        let second = validate(&mut state, 2);

        assert!(!first.is_clean());
        assert!(second.is_clean());
        assert_eq!((state.backlog.clone(), state.drivers.clone()), snapshot);
    }

    #[test]
    fn valid_state_is_untouched() {
        let mut state = state();
        state.commit_pickup(0, 0, 2, -3.0);
        let before = (state.backlog.clone(), state.drivers.clone());

        assert!(validate(&mut state, 2).is_clean());
        assert_eq!((state.backlog.clone(), state.drivers.clone()), before);
    }
}
