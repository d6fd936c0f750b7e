pub mod greedy;
pub mod scoring;

pub use greedy::{run_greedy, MatchSummary};
pub use scoring::{scorer_for, BacklogWeightedScorer, CandidateScorer, NearestScorer};
