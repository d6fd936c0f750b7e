use crate::params::{EngineConfig, ScorerKind};

/// Ranks a restaurant for a driver. Lower scores are more attractive.
///
/// Callers exclude restaurants without backlog before scoring; a scorer is
/// never asked to rank an empty restaurant.
pub trait CandidateScorer: Send + Sync + std::fmt::Debug {
    fn score(&self, distance_km: f64, backlog: i64) -> f64;
}

/// Whether a restaurant with this backlog may be offered to a driver at all.
pub fn is_candidate(backlog: i64) -> bool {
    backlog > 0
}

/// `distance_weight * distance - order_weight * backlog`.
///
/// A slightly farther restaurant with many pending orders outranks a very
/// close one with almost none.
#[derive(Debug, Clone, Copy)]
pub struct BacklogWeightedScorer {
    pub distance_weight: f64,
    pub order_weight: f64,
}

impl BacklogWeightedScorer {
    pub fn new(distance_weight: f64, order_weight: f64) -> Self {
        Self {
            distance_weight,
            order_weight,
        }
    }
}

impl Default for BacklogWeightedScorer {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self::new(config.distance_weight, config.order_weight)
    }
}

impl CandidateScorer for BacklogWeightedScorer {
    fn score(&self, distance_km: f64, backlog: i64) -> f64 {
        self.distance_weight * distance_km - self.order_weight * backlog as f64
    }
}

/// Pure proximity: the closest restaurant with any backlog wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestScorer;

impl CandidateScorer for NearestScorer {
    fn score(&self, distance_km: f64, _backlog: i64) -> f64 {
        distance_km
    }
}

pub fn scorer_for(config: &EngineConfig) -> Box<dyn CandidateScorer> {
    match config.scorer {
        ScorerKind::BacklogWeighted => Box::new(BacklogWeightedScorer::new(
            config.distance_weight,
            config.order_weight,
        )),
        ScorerKind::Nearest => Box::new(NearestScorer),
    }
}
