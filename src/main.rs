use anyhow::Result;
use clap::Parser;
use crozier_lib::model::config::{AppConfig, RecognitionModel, ToleranceModel};
use crozier_lib::model::metrics::init_logging_with_default;
use crozier_lib::runner;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path; a default one is written if it does not exist
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed of the first replicate (overrides run.seed)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output directory (overrides output.dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Simulated time to run for (overrides run.horizon)
    #[arg(long)]
    horizon: Option<f64>,

    /// Recognition model: gestalt, dpresent, uabsent, random, gestaltind, ...
    #[arg(short, long)]
    model: Option<RecognitionModel>,

    /// Tolerance curve: linear, logistic or control
    #[arg(short, long)]
    tolerance: Option<ToleranceModel>,

    /// Number of replicates, run in parallel with consecutive seeds
    #[arg(short, long, default_value_t = 1)]
    replicates: usize,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn load_or_create(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        return AppConfig::load(path);
    }
    let default = AppConfig::default();
    std::fs::write(path, toml::to_string(&default)?)?;
    tracing::info!(path = %path.display(), "Wrote default configuration");
    Ok(default)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging_with_default(if args.quiet { "warn" } else { "info" });

    let mut config = load_or_create(&args.config)?;
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if let Some(dir) = &args.output {
        config.output.dir = dir.display().to_string();
    }
    if let Some(horizon) = args.horizon {
        config.run.horizon = horizon;
    }
    if let Some(model) = args.model {
        config.recognition.model = model;
    }
    if let Some(tolerance) = args.tolerance {
        config.recognition.tolerance = tolerance;
    }
    config.validate()?;
    anyhow::ensure!(args.replicates > 0, "At least one replicate is required");

    let dir = PathBuf::from(&config.output.dir);
    let first_seed = runner::resolve_seed(&config);
    tracing::info!(
        replicates = args.replicates,
        first_seed,
        dir = %dir.display(),
        fingerprint = %config.fingerprint(),
        "Starting runs"
    );

    let mut failures = 0;
    for result in runner::run_replicates(&config, first_seed, args.replicates, &dir) {
        match result {
            Ok(summary) => println!(
                "{}: {:?} at t={:.2}, {} nests alive, {} events, {} births",
                runner::run_name(summary.seed),
                summary.outcome,
                summary.final_time,
                summary.alive_nests,
                summary.events,
                summary.births
            ),
            Err(e) => {
                failures += 1;
                tracing::error!(error = %format!("{e:#}"), "Replicate failed");
            }
        }
    }
    anyhow::ensure!(failures == 0, "{failures} replicate(s) failed");
    Ok(())
}
