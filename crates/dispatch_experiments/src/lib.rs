//! Parallel parameter sweeps over the dispatch engine.
//!
//! Each run generates a seeded demo snapshot, solves it with its own engine
//! configuration and reduces the outcome to [`SolveMetrics`].
//!
//! ```no_run
//! use dispatch_experiments::{export_to_csv, run_parallel_experiments, ParameterSpace};
//!
//! let sets = ParameterSpace::grid()
//!     .num_drivers(vec![50, 100, 200])
//!     .order_weight(vec![0.0, 0.5, 1.0])
//!     .runs_per_combination(5)
//!     .generate();
//!
//! let results = run_parallel_experiments(sets.clone(), None).unwrap();
//! export_to_csv(&results, &sets, "sweep.csv").unwrap();
//! ```
//!
//! - [`parameters`]: grid search and random sampling
//! - [`runner`]: parallel execution using rayon
//! - [`metrics`]: per-run metrics
//! - [`export`]: JSON/CSV output

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{export_to_csv, export_to_json};
pub use metrics::SolveMetrics;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_single_solve, RunError};
