use dispatch_core::params::EngineConfig;
use dispatch_core::seed::SeedParams;

use super::ParameterSpace;

/// One point of the grid before seeds and IDs are attached.
#[derive(Debug, Clone)]
pub(super) struct Combination {
    pub(super) seed_params: SeedParams,
    pub(super) engine: EngineConfig,
}

/// Cross every combination with `values`; an empty axis keeps the base value.
fn expand<T: Copy>(
    combos: Vec<Combination>,
    values: &[T],
    apply: impl Fn(&mut Combination, T),
) -> Vec<Combination> {
    if values.is_empty() {
        return combos;
    }
    let apply = &apply;
    combos
        .into_iter()
        .flat_map(|combo| {
            values.iter().map(move |&value| {
                let mut next = combo.clone();
                apply(&mut next, value);
                next
            })
        })
        .collect()
}

impl ParameterSpace {
    pub(super) fn combinations(&self) -> Vec<Combination> {
        let base = vec![Combination {
            seed_params: self.base_seed.clone(),
            engine: self.base_engine.clone(),
        }];

        let combos = expand(base, &self.num_drivers, |c, v| c.seed_params.num_drivers = v);
        let combos = expand(combos, &self.distance_weights, |c, v| {
            c.engine.distance_weight = v
        });
        let combos = expand(combos, &self.order_weights, |c, v| c.engine.order_weight = v);
        let combos = expand(combos, &self.max_orders_per_driver, |c, v| {
            c.engine.max_orders_per_driver = v
        });
        let combos = expand(combos, &self.target_fractions, |c, v| {
            c.engine.target_fraction = v
        });
        let combos = expand(combos, &self.max_rebalance_iterations, |c, v| {
            c.engine.max_rebalance_iterations = v
        });
        let combos = expand(combos, &self.assignment_policies, |c, v| {
            c.engine.assignment_policy = v
        });
        expand(combos, &self.scorers, |c, v| c.engine.scorer = v)
    }
}
