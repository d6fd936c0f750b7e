use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default weight of pickup distance (km) in the candidate score.
pub const DEFAULT_DISTANCE_WEIGHT: f64 = 1.0;
/// Default weight of restaurant backlog in the candidate score.
pub const DEFAULT_ORDER_WEIGHT: f64 = 0.5;
/// Hard cap on orders a single driver takes in one pickup.
pub const DEFAULT_MAX_ORDERS_PER_DRIVER: u32 = 4;
pub const DEFAULT_TARGET_FRACTION: f64 = 0.2;
pub const DEFAULT_MIN_TARGET_REMAINING: u32 = 2;
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 0.3;
pub const DEFAULT_MAX_REBALANCE_ITERATIONS: u32 = 15;

/// How the greedy matcher treats drivers once backlog becomes scarce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// Earlier drivers take as much as they can; later drivers may stay idle.
    #[default]
    Greedy,
    /// Cap each pickup so every remaining driver can still get at least one order.
    MandatoryMinimum,
}

/// Which scoring function ranks restaurants for a driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Distance minus weighted backlog.
    #[default]
    BacklogWeighted,
    /// Distance only.
    Nearest,
}

/// Tunables for one dispatch engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub distance_weight: f64,
    pub order_weight: f64,
    pub max_orders_per_driver: u32,
    /// Fraction of the mean backlog each restaurant should keep after rebalancing.
    pub target_fraction: f64,
    /// Floor for the rebalancing target.
    pub min_target_remaining: u32,
    /// Slack around the target before a restaurant counts as high or low.
    pub balance_tolerance: f64,
    pub max_rebalance_iterations: u32,
    pub assignment_policy: AssignmentPolicy,
    pub scorer: ScorerKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            distance_weight: DEFAULT_DISTANCE_WEIGHT,
            order_weight: DEFAULT_ORDER_WEIGHT,
            max_orders_per_driver: DEFAULT_MAX_ORDERS_PER_DRIVER,
            target_fraction: DEFAULT_TARGET_FRACTION,
            min_target_remaining: DEFAULT_MIN_TARGET_REMAINING,
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
            max_rebalance_iterations: DEFAULT_MAX_REBALANCE_ITERATIONS,
            assignment_policy: AssignmentPolicy::default(),
            scorer: ScorerKind::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_weights(mut self, distance_weight: f64, order_weight: f64) -> Self {
        self.distance_weight = distance_weight;
        self.order_weight = order_weight;
        self
    }

    pub fn with_max_orders_per_driver(mut self, max_orders: u32) -> Self {
        self.max_orders_per_driver = max_orders;
        self
    }

    pub fn with_target_fraction(mut self, fraction: f64) -> Self {
        self.target_fraction = fraction;
        self
    }

    /// Set the rebalancing iteration cap (0 disables rebalancing).
    pub fn with_max_rebalance_iterations(mut self, iterations: u32) -> Self {
        self.max_rebalance_iterations = iterations;
        self
    }

    pub fn with_assignment_policy(mut self, policy: AssignmentPolicy) -> Self {
        self.assignment_policy = policy;
        self
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_weight("distance_weight", self.distance_weight)?;
        check_weight("order_weight", self.order_weight)?;
        check_weight("balance_tolerance", self.balance_tolerance)?;
        if self.max_orders_per_driver == 0 {
            return Err(ConfigError::ZeroOrdersPerDriver);
        }
        if !(0.0..=1.0).contains(&self.target_fraction) {
            return Err(ConfigError::TargetFractionOutOfRange(self.target_fraction));
        }
        Ok(())
    }

    /// Backlog level every restaurant is pushed toward by the rebalancer.
    ///
    /// `max(min_target_remaining, floor(total_orders / restaurants * target_fraction))`.
    pub fn target_remaining(&self, total_orders: u64, restaurant_count: usize) -> i64 {
        let floor = i64::from(self.min_target_remaining);
        if restaurant_count == 0 {
            return floor;
        }
        let share = (total_orders as f64 / restaurant_count as f64 * self.target_fraction).floor();
        floor.max(share as i64)
    }
}

fn check_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}
