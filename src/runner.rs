//! Running one or many replicates of a configuration.
//!
//! A replicate is a full run with its own seed. Its files are named after
//! the seed (`seed_<n>_evolution.csv`, ...) so replicates of the same
//! configuration can share an output directory.

use crate::model::config::AppConfig;
use crate::model::output::{export_parameters, RunRecorder};
use crate::model::recorder::MemoryRecorder;
use crate::model::{Population, RandomSource, RunSummary};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;

/// File-name prefix for the replicate run with `seed`.
pub fn run_name(seed: u64) -> String {
    format!("seed_{seed}")
}

/// The configured seed, or a fresh one drawn from entropy.
pub fn resolve_seed(config: &AppConfig) -> u64 {
    config
        .run
        .seed
        .unwrap_or_else(|| RandomSource::from_entropy().seed())
}

/// Runs one replicate and writes its tables, history and parameters to `dir`.
pub fn run_replicate(config: &AppConfig, seed: u64, dir: &Path) -> Result<RunSummary> {
    let mut config = config.clone();
    config.run.seed = Some(seed);
    let name = run_name(seed);

    export_parameters(dir, &name, &config, seed)
        .with_context(|| format!("exporting parameters of {name}"))?;
    let mut recorder = RunRecorder::create(dir, &name, &config)?;
    let mut population = Population::new(config, RandomSource::from_seed(seed))?;
    let summary = population
        .simulate(&mut recorder)
        .with_context(|| format!("replicate {name} failed"))?;
    Ok(summary)
}

/// Runs `count` replicates with consecutive seeds starting at `first_seed`,
/// in parallel. Results come back in seed order.
pub fn run_replicates(
    config: &AppConfig,
    first_seed: u64,
    count: usize,
    dir: &Path,
) -> Vec<Result<RunSummary>> {
    (0..count as u64)
        .into_par_iter()
        .map(|offset| run_replicate(config, first_seed.wrapping_add(offset), dir))
        .collect()
}

/// Runs one replicate without touching the filesystem.
pub fn run_in_memory(config: &AppConfig, seed: u64) -> Result<(RunSummary, MemoryRecorder)> {
    let mut config = config.clone();
    config.run.seed = Some(seed);
    let mut recorder = MemoryRecorder::default();
    let mut population = Population::new(config, RandomSource::from_seed(seed))?;
    let summary = population.simulate(&mut recorder)?;
    Ok((summary, recorder))
}
