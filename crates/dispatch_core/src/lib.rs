//! Driver-to-restaurant dispatch: assign idle drivers to restaurant backlogs,
//! rebalance what is left, and report on the outcome.
//!
//! ```no_run
//! use dispatch_core::engine::DispatchEngine;
//! use dispatch_core::seed::{generate_snapshot, SeedParams};
//!
//! let mut snapshot = generate_snapshot(&SeedParams::default().with_seed(42)).unwrap();
//! let outcome = DispatchEngine::default().solve(&mut snapshot).unwrap();
//! println!("{} drivers dispatched", outcome.assignments.len());
//! ```

pub mod engine;
pub mod error;
pub mod matching;
pub mod model;
pub mod params;
pub mod rebalance;
pub mod report;
pub mod seed;
pub mod spatial;
pub mod state;
pub mod validate;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use engine::{generate_report, solve, DispatchEngine, SolveOutcome};
pub use error::{ConfigError, InputError};
pub use model::{Assignment, Driver, DriverId, GeoPoint, Restaurant, RestaurantId, Snapshot};
pub use params::{AssignmentPolicy, EngineConfig, ScorerKind};
pub use report::Report;
