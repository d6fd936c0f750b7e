//! Parallel solve execution using rayon.
//!
//! Every run generates its own snapshot and builds its own engine, so runs
//! share nothing and can execute on any worker thread.

use std::time::Instant;

use dispatch_core::engine::DispatchEngine;
use dispatch_core::error::{ConfigError, InputError};
use dispatch_core::seed::generate_snapshot;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::metrics::{extract_metrics, SolveMetrics};
use crate::parameters::ParameterSet;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("experiment {experiment_id} run {run_id}: {source}")]
    Config {
        experiment_id: String,
        run_id: usize,
        #[source]
        source: ConfigError,
    },
    #[error("experiment {experiment_id} run {run_id}: {source}")]
    Input {
        experiment_id: String,
        run_id: usize,
        #[source]
        source: InputError,
    },
    #[error("failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Generate the run's snapshot, solve it and extract metrics.
pub fn run_single_solve(param_set: &ParameterSet) -> Result<SolveMetrics, RunError> {
    let config_error = |source| RunError::Config {
        experiment_id: param_set.experiment_id.clone(),
        run_id: param_set.run_id,
        source,
    };

    let engine = DispatchEngine::new(param_set.engine.clone()).map_err(config_error)?;
    let before = generate_snapshot(&param_set.seed_params()).map_err(config_error)?;
    let mut after = before.clone();

    let started = Instant::now();
    let outcome = engine.solve(&mut after).map_err(|source| RunError::Input {
        experiment_id: param_set.experiment_id.clone(),
        run_id: param_set.run_id,
        source,
    })?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    debug!(
        experiment = %param_set.experiment_id,
        run = param_set.run_id,
        assigned = outcome.assignments.len(),
        elapsed_ms,
        "run finished"
    );
    Ok(extract_metrics(&before, &after, &outcome, elapsed_ms))
}

/// Run multiple solves in parallel with a progress bar.
///
/// Results come back in the same order as `parameter_sets`. `num_threads`
/// of `None` uses rayon's default pool size.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<SolveMetrics>, RunError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SolveMetrics>, RunError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("#>-"));
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    info!(runs = total, threads = pool.current_num_threads(), "starting sweep");

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_solve(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}
