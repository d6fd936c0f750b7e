use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{ParameterSet, ParameterSpace};

impl ParameterSpace {
    /// Generate random parameter sets (Monte Carlo sampling).
    ///
    /// Draws combinations from the grid until `count` distinct ones are found
    /// or the grid is exhausted.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let combos = self.combinations();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut parameter_sets = Vec::new();
        let mut seen = HashSet::new();
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 10000;

        while parameter_sets.len() < count && attempts < MAX_ATTEMPTS {
            attempts += 1;
            let Some(combo) = combos.choose(&mut rng) else {
                break;
            };

            let key = format!("{:?}", combo);
            if !seen.insert(key) {
                if seen.len() == combos.len() {
                    break;
                }
                continue;
            }

            let seed_value = seed
                .wrapping_add(parameter_sets.len() as u64)
                .wrapping_mul(0x9e3779b9);
            parameter_sets.push(ParameterSet::new(
                combo.seed_params.clone(),
                combo.engine.clone(),
                format!("random_{}", parameter_sets.len()),
                0,
                seed_value,
            ));
        }

        parameter_sets
    }
}
