//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every section falls back to its `Default` values,
//! so a config file only needs to name the parameters it changes.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [colony]
//! colony_count = 20
//! worker_count = 10
//! cue_count = 5
//!
//! [recognition]
//! model = "gestalt"
//! tolerance = "logistic"
//!
//! [demography]
//! kill_mode = "sorted"
//! repro_mode = "both"
//!
//! [run]
//! horizon = 5000.0
//! seed = 42
//! ```

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How a resident compares an incoming worker's cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionModel {
    /// Bray-Curtis between the colony mean profile and the incoming profile.
    #[default]
    Gestalt,
    /// Colony mean as template; cues missing from the incomer count more.
    #[serde(alias = "dpresent")]
    DesirablePresent,
    /// Colony mean as template; extra cues on the incomer count more.
    #[serde(alias = "uabsent")]
    UndesirableAbsent,
    /// Coin flip, no recognition at all.
    #[serde(alias = "random")]
    Control,
    /// Gestalt distance from the evaluating resident's own cues.
    #[serde(alias = "gestaltind")]
    GestaltIndividual,
    #[serde(alias = "dpresentind")]
    DesirablePresentIndividual,
    #[serde(alias = "uabsentind")]
    UndesirableAbsentIndividual,
}

/// The three dissimilarity measures behind the recognition models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Gestalt,
    DesirablePresent,
    UndesirableAbsent,
}

impl RecognitionModel {
    pub const ALL: [RecognitionModel; 7] = [
        RecognitionModel::Gestalt,
        RecognitionModel::DesirablePresent,
        RecognitionModel::UndesirableAbsent,
        RecognitionModel::Control,
        RecognitionModel::GestaltIndividual,
        RecognitionModel::DesirablePresentIndividual,
        RecognitionModel::UndesirableAbsentIndividual,
    ];

    /// Distance measure used by this model, `None` for the control model.
    pub fn metric(self) -> Option<Metric> {
        match self {
            RecognitionModel::Gestalt | RecognitionModel::GestaltIndividual => {
                Some(Metric::Gestalt)
            }
            RecognitionModel::DesirablePresent | RecognitionModel::DesirablePresentIndividual => {
                Some(Metric::DesirablePresent)
            }
            RecognitionModel::UndesirableAbsent
            | RecognitionModel::UndesirableAbsentIndividual => Some(Metric::UndesirableAbsent),
            RecognitionModel::Control => None,
        }
    }

    /// True when the evaluator compares against its own cues instead of the
    /// colony mean.
    pub fn uses_individual_template(self) -> bool {
        matches!(
            self,
            RecognitionModel::GestaltIndividual
                | RecognitionModel::DesirablePresentIndividual
                | RecognitionModel::UndesirableAbsentIndividual
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecognitionModel::Gestalt => "gestalt",
            RecognitionModel::DesirablePresent => "desirable_present",
            RecognitionModel::UndesirableAbsent => "undesirable_absent",
            RecognitionModel::Control => "control",
            RecognitionModel::GestaltIndividual => "gestalt_individual",
            RecognitionModel::DesirablePresentIndividual => "desirable_present_individual",
            RecognitionModel::UndesirableAbsentIndividual => "undesirable_absent_individual",
        }
    }
}

impl FromStr for RecognitionModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gestalt" => Ok(RecognitionModel::Gestalt),
            "desirable_present" | "dpresent" => Ok(RecognitionModel::DesirablePresent),
            "undesirable_absent" | "uabsent" => Ok(RecognitionModel::UndesirableAbsent),
            "control" | "random" => Ok(RecognitionModel::Control),
            "gestalt_individual" | "gestaltind" => Ok(RecognitionModel::GestaltIndividual),
            "desirable_present_individual" | "dpresentind" => {
                Ok(RecognitionModel::DesirablePresentIndividual)
            }
            "undesirable_absent_individual" | "uabsentind" => {
                Ok(RecognitionModel::UndesirableAbsentIndividual)
            }
            other => Err(SimError::configuration(format!(
                "unknown recognition model '{other}'"
            ))),
        }
    }
}

impl fmt::Display for RecognitionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from distance to acceptance probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceModel {
    /// `intercept + slope * distance`
    #[default]
    Linear,
    /// `1 / (1 + exp(intercept + distance * slope))`
    Logistic,
    /// Uniform draw, distance ignored.
    #[serde(alias = "random")]
    Control,
}

impl FromStr for ToleranceModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(ToleranceModel::Linear),
            "logistic" => Ok(ToleranceModel::Logistic),
            "control" | "random" => Ok(ToleranceModel::Control),
            other => Err(SimError::configuration(format!(
                "unknown tolerance model '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ToleranceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToleranceModel::Linear => "linear",
            ToleranceModel::Logistic => "logistic",
            ToleranceModel::Control => "control",
        })
    }
}

/// Periodic mass-kill policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KillMode {
    /// Uniformly random subset of alive nests.
    #[default]
    Random,
    /// Every nest at or below the k-th smallest stock.
    Sorted,
    #[serde(alias = "none")]
    Disabled,
}

impl FromStr for KillMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(KillMode::Random),
            "sorted" => Ok(KillMode::Sorted),
            "disabled" | "none" => Ok(KillMode::Disabled),
            other => Err(SimError::configuration(format!(
                "unknown kill mode '{other}'"
            ))),
        }
    }
}

/// Which reproduction routes refill the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReproMode {
    /// Periodic refill up to the colony count.
    Mass,
    /// One replacement per starvation death.
    Individual,
    #[default]
    Both,
    #[serde(alias = "control", alias = "none")]
    Disabled,
}

impl ReproMode {
    pub fn allows_mass(self) -> bool {
        matches!(self, ReproMode::Mass | ReproMode::Both)
    }

    pub fn allows_individual(self) -> bool {
        matches!(self, ReproMode::Individual | ReproMode::Both)
    }
}

impl FromStr for ReproMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mass" => Ok(ReproMode::Mass),
            "individual" => Ok(ReproMode::Individual),
            "both" => Ok(ReproMode::Both),
            "disabled" | "control" | "none" => Ok(ReproMode::Disabled),
            other => Err(SimError::configuration(format!(
                "unknown reproduction mode '{other}'"
            ))),
        }
    }
}

/// Dynamics of the global foraging stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoodModel {
    /// Grows at `regen_rate` per time unit, floored at zero.
    #[default]
    Linear,
    /// Pinned to `constant_stock` on every event.
    Constant,
    /// Reset to `init_food_stock` once per `tick_interval`.
    #[serde(alias = "tick")]
    Periodic,
}

impl FromStr for FoodModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(FoodModel::Linear),
            "constant" => Ok(FoodModel::Constant),
            "periodic" | "tick" => Ok(FoodModel::Periodic),
            other => Err(SimError::configuration(format!(
                "unknown food model '{other}'"
            ))),
        }
    }
}

/// Colony composition and upkeep.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColonyConfig {
    /// Target number of alive nests.
    pub colony_count: usize,
    /// Workers per nest, fixed for the nest's lifetime.
    pub worker_count: usize,
    /// Length of every cue profile.
    pub cue_count: usize,
    pub init_nest_stock: f64,
    /// Rate of the exponential distribution founding cues are drawn from.
    pub cue_exp_rate: f64,
    /// Upkeep per action, scaled by total cue abundance.
    pub metabolic_cost: f64,
    /// Passive stock regeneration per time unit.
    pub nest_stock_rate: f64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            colony_count: 20,
            worker_count: 10,
            cue_count: 5,
            init_nest_stock: 25.0,
            cue_exp_rate: 0.1,
            metabolic_cost: 40.0,
            nest_stock_rate: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub mutation_bias: f64,
    /// Noise applied to worker cues and tolerance genes.
    pub mutation_strength: f64,
    /// Noise applied to nest mean cues and the nest neutral gene.
    pub mutation_strength_cues: f64,
    pub init_intercept: f64,
    pub init_slope: f64,
    /// Inherit tolerance genes from the mother instead of redrawing them.
    pub coevolve: bool,
    /// Time from which coevolution applies.
    pub coevolve_start_time: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_bias: 0.0,
            mutation_strength: 0.1,
            mutation_strength_cues: 0.1,
            init_intercept: 0.0,
            init_slope: 1.0,
            coevolve: true,
            coevolve_start_time: 0.0,
        }
    }
}

impl EvolutionConfig {
    /// Whether daughters inherit tolerance genes at time `now`.
    pub fn coevolving_at(&self, now: f64) -> bool {
        self.coevolve && now >= self.coevolve_start_time
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RecognitionConfig {
    pub model: RecognitionModel,
    pub tolerance: ToleranceModel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DemographyConfig {
    pub kill_mode: KillMode,
    /// Fraction of `colony_count` removed per mass kill.
    pub frac_killed: f64,
    pub repro_mode: ReproMode,
    /// Reset every stock after a mass reproduction.
    pub food_reset: bool,
    /// Interval between mass kills (and between mass reproductions).
    pub removal_interval: f64,
    /// Probability that a dying nest is archived for output.
    pub frac_dead_nests_recorded: f64,
}

impl Default for DemographyConfig {
    fn default() -> Self {
        Self {
            kill_mode: KillMode::Random,
            frac_killed: 0.4,
            repro_mode: ReproMode::Both,
            food_reset: false,
            removal_interval: 1000.0,
            frac_dead_nests_recorded: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FoodConfig {
    pub model: FoodModel,
    pub init_food_stock: f64,
    pub regen_rate: f64,
    pub constant_stock: f64,
    pub tick_interval: f64,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            model: FoodModel::Linear,
            init_food_stock: 300.0,
            regen_rate: 1.0,
            constant_stock: 300.0,
            tick_interval: 100.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Simulated time at which the run stops.
    pub horizon: f64,
    /// Rate of the exponential waiting time between a worker's actions.
    #[serde(alias = "mean_action_time")]
    pub action_rate: f64,
    pub seed: Option<u64>,
    /// Events between progress log lines.
    pub progress_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            horizon: 10_000.0,
            action_rate: 1.0,
            seed: None,
            progress_interval: 100_000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    /// Simulated time between snapshots.
    pub output_interval: f64,
    /// Parameter names whose values prefix every output row.
    pub record_params: Vec<String>,
    /// Fraction of live workers written out at the end of the run.
    pub final_individual_fraction: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output_sim".to_string(),
            output_interval: 10.0,
            record_params: Vec::new(),
            final_individual_fraction: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub colony: ColonyConfig,
    pub evolution: EvolutionConfig,
    pub recognition: RecognitionConfig,
    pub demography: DemographyConfig,
    pub food: FoodConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Colony validation
        anyhow::ensure!(self.colony.colony_count > 0, "Colony count must be positive");
        anyhow::ensure!(
            self.colony.worker_count >= 2,
            "Worker count must be at least 2 (resident checks need a second worker)"
        );
        anyhow::ensure!(self.colony.cue_count > 0, "Cue count must be positive");
        anyhow::ensure!(
            self.colony.cue_exp_rate > 0.0,
            "Cue exponential rate must be positive"
        );
        anyhow::ensure!(
            self.colony.metabolic_cost >= 0.0,
            "Metabolic cost must be non-negative"
        );
        anyhow::ensure!(
            self.colony.nest_stock_rate >= 0.0,
            "Nest stock rate must be non-negative"
        );

        // Evolution validation
        anyhow::ensure!(
            self.evolution.mutation_strength >= 0.0,
            "Mutation strength must be non-negative"
        );
        anyhow::ensure!(
            self.evolution.mutation_strength_cues >= 0.0,
            "Cue mutation strength must be non-negative"
        );

        // Demography validation
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.demography.frac_killed),
            "Fraction killed must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.demography.frac_dead_nests_recorded),
            "Dead nest recording fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.demography.removal_interval > 0.0,
            "Removal interval must be positive"
        );

        // Food validation
        anyhow::ensure!(
            self.food.regen_rate >= 0.0,
            "Food regeneration rate must be non-negative"
        );
        anyhow::ensure!(
            self.food.tick_interval > 0.0,
            "Food tick interval must be positive"
        );

        // Run validation
        anyhow::ensure!(self.run.horizon >= 0.0, "Horizon must be non-negative");
        anyhow::ensure!(self.run.action_rate > 0.0, "Action rate must be positive");
        anyhow::ensure!(
            self.run.progress_interval > 0,
            "Progress interval must be positive"
        );

        // Output validation
        anyhow::ensure!(
            self.output.output_interval > 0.0,
            "Output interval must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.output.final_individual_fraction),
            "Final individual fraction must be in [0.0, 1.0]"
        );
        let known = self.flatten();
        for name in &self.output.record_params {
            anyhow::ensure!(
                lookup(&known, name).is_some(),
                "Unknown parameter in record_params: {name}"
            );
        }

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config file {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Digest of every parameter that affects the model (run bookkeeping and
    /// output settings excluded).
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.colony).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.recognition).as_bytes());
        hasher.update(format!("{:?}", self.demography).as_bytes());
        hasher.update(format!("{:?}", self.food).as_bytes());
        hasher.update(format!("{:?}", self.run.horizon).as_bytes());
        hasher.update(format!("{:?}", self.run.action_rate).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Every scalar parameter as `section.name -> value`.
    pub fn flatten(&self) -> BTreeMap<String, serde_json::Value> {
        let mut out = BTreeMap::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, value) in sections {
                if let serde_json::Value::Object(fields) = value {
                    for (name, v) in fields {
                        out.insert(format!("{section}.{name}"), v);
                    }
                }
            }
        }
        out
    }

    /// Looks up a parameter by `section.name` or by a bare, unambiguous name.
    pub fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        lookup(&self.flatten(), name)
    }
}

fn lookup(
    flat: &BTreeMap<String, serde_json::Value>,
    name: &str,
) -> Option<serde_json::Value> {
    if let Some(v) = flat.get(name) {
        return Some(v.clone());
    }
    let suffix = format!(".{name}");
    let mut hits = flat.iter().filter(|(k, _)| k.ends_with(&suffix));
    match (hits.next(), hits.next()) {
        (Some((_, v)), None) => Some(v.clone()),
        _ => None,
    }
}
