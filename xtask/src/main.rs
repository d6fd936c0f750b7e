use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use dispatch_core::engine::DispatchEngine;
use dispatch_core::params::{AssignmentPolicy, EngineConfig, ScorerKind};
use dispatch_core::seed::{generate_snapshot, SeedParams};
use dispatch_experiments::runner::run_parallel_experiments_with_progress;
use dispatch_experiments::{export_to_csv, export_to_json, ParameterSpace};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the driver dispatch workspace",
    long_about = "A unified CLI for running demo solves, parameter sweeps, benchmarks,\n\
                  and CI checks in the driver dispatch workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a seeded demo snapshot and print the JSON report
    Solve {
        /// RNG seed for the demo snapshot (random when omitted)
        #[arg(long, env = "DISPATCH_SEED")]
        seed: Option<u64>,
        /// Number of drivers to generate
        #[arg(long)]
        drivers: Option<usize>,
        /// JSON file with `engine` and/or `seed` sections
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(value_enum, long)]
        policy: Option<PolicyArg>,
        #[arg(value_enum, long)]
        scorer: Option<ScorerArg>,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a grid sweep and export the metrics
    Sweep {
        #[arg(long, value_delimiter = ',', default_values_t = [50, 100, 200])]
        drivers: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.5, 1.0])]
        order_weights: Vec<f64>,
        #[arg(value_enum, long, value_delimiter = ',', default_values = ["greedy", "mandatory-minimum"])]
        policies: Vec<PolicyArg>,
        /// Seeds per parameter combination
        #[arg(long, default_value_t = 5)]
        runs: usize,
        /// Worker threads (rayon default when omitted)
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long, default_value = "sweep_results.json")]
        json: PathBuf,
        #[arg(long, default_value = "sweep_results.csv")]
        csv: PathBuf,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Greedy,
    MandatoryMinimum,
}

impl From<PolicyArg> for AssignmentPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Greedy => Self::Greedy,
            PolicyArg::MandatoryMinimum => Self::MandatoryMinimum,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScorerArg {
    BacklogWeighted,
    Nearest,
}

impl From<ScorerArg> for ScorerKind {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::BacklogWeighted => Self::BacklogWeighted,
            ScorerArg::Nearest => Self::Nearest,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

/// Contents of a `--config` file; missing sections keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SolveConfig {
    engine: EngineConfig,
    seed: SeedParams,
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn spawn(program: &str, args: &[&str]) -> ExitStatus {
    eprintln!("+ {program} {}", args.join(" "));
    match Command::new(program).args(args).status() {
        Ok(status) => status,
        Err(error) => {
            eprintln!("failed to execute {program}: {error}");
            exit(1);
        }
    }
}

fn run_cargo(args: &[&str]) {
    let status = spawn("cargo", args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = spawn("git", args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn load_config(path: Option<&Path>) -> Result<SolveConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(SolveConfig::default()),
    }
}

// ── commands ───────────────────────────────────────────────────────

struct SolveArgs {
    seed: Option<u64>,
    drivers: Option<usize>,
    config: Option<PathBuf>,
    policy: Option<PolicyArg>,
    scorer: Option<ScorerArg>,
    output: Option<PathBuf>,
}

fn solve(args: SolveArgs) -> Result<(), Box<dyn Error>> {
    let SolveConfig {
        mut engine,
        seed: mut seed_params,
    } = load_config(args.config.as_deref())?;

    if let Some(seed) = args.seed {
        seed_params = seed_params.with_seed(seed);
    }
    if let Some(drivers) = args.drivers {
        seed_params = seed_params.with_num_drivers(drivers);
    }
    if let Some(policy) = args.policy {
        engine = engine.with_assignment_policy(policy.into());
    }
    if let Some(scorer) = args.scorer {
        engine = engine.with_scorer(scorer.into());
    }

    let snapshot = generate_snapshot(&seed_params)?;
    let report = DispatchEngine::new(engine)?.generate_report(&snapshot)?;
    info!(
        drivers_assigned = report.stats.total_drivers_assigned,
        orders_assigned = report.stats.total_orders_assigned,
        orders_remaining = report.stats.total_orders_remaining,
        utilization = report.stats.utilization_rate,
        "report ready"
    );

    let json = serde_json::to_string_pretty(&report)?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

struct SweepArgs {
    drivers: Vec<usize>,
    order_weights: Vec<f64>,
    policies: Vec<PolicyArg>,
    runs: usize,
    threads: Option<usize>,
    json: PathBuf,
    csv: PathBuf,
}

fn sweep(args: SweepArgs) -> Result<(), Box<dyn Error>> {
    let sets = ParameterSpace::grid()
        .num_drivers(args.drivers)
        .order_weight(args.order_weights)
        .assignment_policy(args.policies.into_iter().map(Into::into).collect())
        .runs_per_combination(args.runs)
        .generate();

    let results = run_parallel_experiments_with_progress(sets.clone(), args.threads, true)?;
    export_to_json(&results, &args.json)?;
    export_to_csv(&results, &sets, &args.csv)?;
    info!(
        runs = results.len(),
        json = %args.json.display(),
        csv = %args.csv.display(),
        "sweep exported"
    );
    Ok(())
}

fn bench_compare() -> Result<(), Box<dyn Error>> {
    let baseline_dir = Path::new("target/criterion");
    if baseline_dir.exists() {
        step("Removing existing benchmark data");
        fs::remove_dir_all(baseline_dir)?;
    }

    step("Stashing current changes");
    run_git(&[
        "stash",
        "push",
        "-m",
        "Temporary stash for benchmark comparison",
    ]);

    step("Running benchmark to create baseline");
    run_cargo(&[
        "bench",
        "--package",
        "dispatch_core",
        "--bench",
        "performance",
        "--",
        "--save-baseline",
        "main",
    ]);

    step("Reapplying changes");
    run_git(&["stash", "pop"]);

    step("Running benchmark comparing against baseline");
    run_cargo(&[
        "bench",
        "--package",
        "dispatch_core",
        "--bench",
        "performance",
        "--",
        "--baseline",
        "main",
    ]);

    eprintln!("\nDone! Check the output above to see performance comparison.");
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test dispatch_core");
    run_cargo(&["test", "-p", "dispatch_core"]);

    step("Test dispatch_experiments");
    run_cargo(&["test", "-p", "dispatch_experiments"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "dispatch_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Solve {
            seed,
            drivers,
            config,
            policy,
            scorer,
            output,
        } => solve(SolveArgs {
            seed,
            drivers,
            config,
            policy,
            scorer,
            output,
        })?,
        Commands::Sweep {
            drivers,
            order_weights,
            policies,
            runs,
            threads,
            json,
            csv,
        } => sweep(SweepArgs {
            drivers,
            order_weights,
            policies,
            runs,
            threads,
            json,
            csv,
        })?,
        Commands::Bench => {
            run_cargo(&["bench", "--package", "dispatch_core", "--bench", "performance"]);
        }
        Commands::BenchCompare => bench_compare()?,
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
    Ok(())
}
