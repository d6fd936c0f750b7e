use tracing::debug;

use crate::params::{AssignmentPolicy, EngineConfig};
use crate::state::SolveState;

use super::scoring::{is_candidate, CandidateScorer};

/// What the greedy pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub drivers_matched: usize,
    pub orders_picked: i64,
    /// Drivers never considered because the backlog ran out first.
    pub drivers_skipped: usize,
}

/// Best-scoring restaurant with backlog for one driver.
///
/// Strictly lower scores win, so the first restaurant in input order keeps
/// ties.
fn best_candidate(
    state: &SolveState,
    scorer: &dyn CandidateScorer,
    driver: usize,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for restaurant in 0..state.restaurant_count() {
        let backlog = state.backlog(restaurant);
        if !is_candidate(backlog) {
            continue;
        }
        let score = scorer.score(state.matrix().get(driver, restaurant), backlog);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((restaurant, score)),
        }
    }
    best
}

/// Assign drivers one by one, in input order, to their best candidate.
///
/// Each pickup is `min(capacity, backlog, max_orders_per_driver)`. Under
/// [`AssignmentPolicy::MandatoryMinimum`] the pickup is further capped so
/// one order stays available for every driver still waiting, but never
/// below one. Stops as soon as no backlog is left.
pub fn run_greedy(
    state: &mut SolveState,
    scorer: &dyn CandidateScorer,
    config: &EngineConfig,
) -> MatchSummary {
    let mut summary = MatchSummary::default();
    let driver_count = state.driver_count();
    let per_driver_cap = i64::from(config.max_orders_per_driver);

    for driver in 0..driver_count {
        let remaining = state.remaining_backlog();
        if remaining <= 0 {
            summary.drivers_skipped = driver_count - driver;
            break;
        }

        let Some((restaurant, score)) = best_candidate(state, scorer, driver) else {
            continue;
        };

        let mut quantity = state
            .driver(driver)
            .capacity
            .min(state.backlog(restaurant))
            .min(per_driver_cap);

        if config.assignment_policy == AssignmentPolicy::MandatoryMinimum {
            let still_waiting = (driver_count - driver - 1) as i64;
            quantity = quantity.min(remaining - still_waiting).max(1);
        }

        if quantity <= 0 {
            continue;
        }

        state.commit_pickup(driver, restaurant, quantity, score);
        summary.drivers_matched += 1;
        summary.orders_picked += quantity;
        debug!(driver, restaurant, quantity, score, "committed pickup");
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scoring::{BacklogWeightedScorer, NearestScorer};
    use crate::model::{Driver, GeoPoint, Restaurant};

    fn origin() -> GeoPoint {
        GeoPoint::new(42.6966060, 23.3204766)
    }

    fn greedy(
        drivers: &[Driver],
        restaurants: &[Restaurant],
        config: &EngineConfig,
    ) -> (SolveState, MatchSummary) {
        let mut state = SolveState::new(drivers, restaurants);
        let summary = run_greedy(&mut state, &BacklogWeightedScorer::default(), config);
        (state, summary)
    }

    #[test]
    fn takes_capacity_bounded_quantity() {
        let drivers = vec![Driver::new(1, "d1", origin(), 3)];
        let restaurants = vec![Restaurant::new(1, "r1", origin(), 10)];
        let (state, summary) = greedy(&drivers, &restaurants, &EngineConfig::default());

        assert_eq!(summary.drivers_matched, 1);
        assert_eq!(state.driver(0).orders, 3);
        assert_eq!(state.backlog(0), 7);
    }

    #[test]
    fn per_driver_cap_limits_large_capacity() {
        let drivers = vec![Driver::new(1, "d1", origin(), 10)];
        let restaurants = vec![Restaurant::new(1, "r1", origin(), 50)];
        let (state, _) = greedy(&drivers, &restaurants, &EngineConfig::default());
        assert_eq!(state.driver(0).orders, 4);
    }

    #[test]
    fn first_restaurant_wins_ties() {
        let drivers = vec![Driver::new(1, "d1", origin(), 2)];
        let restaurants = vec![
            Restaurant::new(1, "first", origin(), 8),
            Restaurant::new(2, "second", origin(), 8),
        ];
        let (state, _) = greedy(&drivers, &restaurants, &EngineConfig::default());
        assert_eq!(state.driver(0).restaurant, Some(0));
    }

    #[test]
    fn skips_empty_restaurants() {
        let drivers = vec![Driver::new(1, "d1", origin(), 2)];
        let far = GeoPoint::new(origin().lat + 0.05, origin().lng);
        let restaurants = vec![
            Restaurant::new(1, "empty", origin(), 0),
            Restaurant::new(2, "busy", far, 1),
        ];
        let (state, _) = greedy(&drivers, &restaurants, &EngineConfig::default());
        assert_eq!(state.driver(0).restaurant, Some(1));
        assert_eq!(state.driver(0).orders, 1);
    }

    #[test]
    fn stops_once_backlog_is_exhausted() {
        let drivers = vec![
            Driver::new(1, "d1", origin(), 3),
            Driver::new(2, "d2", origin(), 3),
            Driver::new(3, "d3", origin(), 3),
        ];
        let restaurants = vec![Restaurant::new(1, "r1", origin(), 2)];
        let (state, summary) = greedy(&drivers, &restaurants, &EngineConfig::default());

        assert_eq!(summary.drivers_matched, 1);
        assert_eq!(summary.drivers_skipped, 2);
        assert_eq!(state.driver(1).restaurant, None);
        assert_eq!(state.backlog(0), 0);
    }

    #[test]
    fn mandatory_minimum_spreads_scarce_backlog() {
        let drivers = vec![
            Driver::new(1, "d1", origin(), 3),
            Driver::new(2, "d2", origin(), 3),
            Driver::new(3, "d3", origin(), 3),
        ];
        let restaurants = vec![Restaurant::new(1, "r1", origin(), 4)];
        let config =
            EngineConfig::default().with_assignment_policy(AssignmentPolicy::MandatoryMinimum);
        let (state, summary) = greedy(&drivers, &restaurants, &config);

        assert_eq!(summary.drivers_matched, 3);
        assert_eq!(state.driver(0).orders, 2);
        assert_eq!(state.driver(1).orders, 1);
        assert_eq!(state.driver(2).orders, 1);
        assert_eq!(state.backlog(0), 0);
    }

    #[test]
    fn nearest_scorer_ignores_busier_restaurant() {
        let drivers = vec![Driver::new(1, "d1", origin(), 10)];
        let far = GeoPoint::new(origin().lat + 0.02, origin().lng);
        let restaurants = vec![
            Restaurant::new(1, "near", origin(), 2),
            Restaurant::new(2, "far", far, 20),
        ];
        let mut state = SolveState::new(&drivers, &restaurants);
        run_greedy(&mut state, &NearestScorer, &EngineConfig::default());
        assert_eq!(state.driver(0).restaurant, Some(0));
        assert_eq!(state.driver(0).orders, 2);
    }
}
