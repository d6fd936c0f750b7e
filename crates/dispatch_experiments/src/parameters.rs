//! Parameter variation framework for exploring the dispatch parameter space.
//!
//! A [`ParameterSpace`] lists the values to try for each knob; unset knobs
//! fall back to the base [`SeedParams`] and [`EngineConfig`]. Grid search
//! takes the Cartesian product, random sampling draws unique combinations.

use dispatch_core::params::{AssignmentPolicy, EngineConfig, ScorerKind};
use dispatch_core::seed::SeedParams;
use serde::Serialize;

mod combinations;
mod sampling;

/// One solve to run: demo data to generate plus the engine to run it with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    pub seed_params: SeedParams,
    pub engine: EngineConfig,
    /// Unique experiment ID for this parameter configuration.
    pub experiment_id: String,
    /// Run ID within the experiment (for repeated runs with the same knobs).
    pub run_id: usize,
    /// Seed used for this run's snapshot.
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(
        seed_params: SeedParams,
        engine: EngineConfig,
        experiment_id: String,
        run_id: usize,
        seed: u64,
    ) -> Self {
        Self {
            seed_params,
            engine,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// Seed params with this run's seed applied.
    pub fn seed_params(&self) -> SeedParams {
        self.seed_params.clone().with_seed(self.seed)
    }
}

/// Defines a parameter space for exploration.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base_seed: SeedParams,
    base_engine: EngineConfig,
    num_drivers: Vec<usize>,
    distance_weights: Vec<f64>,
    order_weights: Vec<f64>,
    max_orders_per_driver: Vec<u32>,
    target_fractions: Vec<f64>,
    max_rebalance_iterations: Vec<u32>,
    assignment_policies: Vec<AssignmentPolicy>,
    scorers: Vec<ScorerKind>,
    runs_per_combination: usize,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base_seed: SeedParams::default(),
            base_engine: EngineConfig::default(),
            num_drivers: Vec::new(),
            distance_weights: Vec::new(),
            order_weights: Vec::new(),
            max_orders_per_driver: Vec::new(),
            target_fractions: Vec::new(),
            max_rebalance_iterations: Vec::new(),
            assignment_policies: Vec::new(),
            scorers: Vec::new(),
            runs_per_combination: 1,
        }
    }

    /// Start a grid search definition.
    pub fn grid() -> Self {
        Self::new()
    }

    pub fn num_drivers(mut self, counts: Vec<usize>) -> Self {
        self.num_drivers = counts;
        self
    }

    pub fn distance_weight(mut self, weights: Vec<f64>) -> Self {
        self.distance_weights = weights;
        self
    }

    pub fn order_weight(mut self, weights: Vec<f64>) -> Self {
        self.order_weights = weights;
        self
    }

    pub fn max_orders_per_driver(mut self, caps: Vec<u32>) -> Self {
        self.max_orders_per_driver = caps;
        self
    }

    pub fn target_fraction(mut self, fractions: Vec<f64>) -> Self {
        self.target_fractions = fractions;
        self
    }

    pub fn max_rebalance_iterations(mut self, caps: Vec<u32>) -> Self {
        self.max_rebalance_iterations = caps;
        self
    }

    pub fn assignment_policy(mut self, policies: Vec<AssignmentPolicy>) -> Self {
        self.assignment_policies = policies;
        self
    }

    pub fn scorer(mut self, scorers: Vec<ScorerKind>) -> Self {
        self.scorers = scorers;
        self
    }

    /// Repeat every combination with `runs` different seeds.
    pub fn runs_per_combination(mut self, runs: usize) -> Self {
        self.runs_per_combination = runs.max(1);
        self
    }

    /// Set base seed parameters (used as defaults).
    pub fn with_base_seed(mut self, base: SeedParams) -> Self {
        self.base_seed = base;
        self
    }

    /// Set base engine configuration (used as defaults).
    pub fn with_base_engine(mut self, base: EngineConfig) -> Self {
        self.base_engine = base;
        self
    }

    /// Generate all parameter sets using grid search (Cartesian product).
    pub fn generate(&self) -> Vec<ParameterSet> {
        let mut sets = Vec::new();
        for (experiment_id, combo) in self.combinations().into_iter().enumerate() {
            for run_id in 0..self.runs_per_combination {
                sets.push(ParameterSet::new(
                    combo.seed_params.clone(),
                    combo.engine.clone(),
                    format!("exp_{experiment_id}"),
                    run_id,
                    run_seed(experiment_id, run_id),
                ));
            }
        }
        sets
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn run_seed(experiment_id: usize, run_id: usize) -> u64 {
    (experiment_id as u64)
        .wrapping_mul(0x9e3779b9)
        .wrapping_add(run_id as u64)
}
