use serde::{Deserialize, Serialize};

/// Identifier of a nest. Allocated from a monotonically increasing counter
/// and never reused within a run.
pub type NestId = u32;

/// Identifier of a worker, unique only within its owning nest.
pub type IndividualId = u32;

/// Mother ID recorded for the founding cohort.
pub const FOUNDER_MOTHER_ID: NestId = 0;

/// Tallies of what the workers of a nest (or of the whole population) did.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounters {
    /// Events processed for workers of this nest.
    pub actions: u64,
    /// Outbound trips started.
    pub departures: u64,
    /// Outbound trips that targeted another nest.
    pub steals: u64,
    /// Raids that got through the target's admission check.
    pub successful_steals: u64,
    /// Outbound trips that drew from the global food stock.
    pub successful_forages: u64,
    /// Inbound trips completed.
    pub returns: u64,
    /// Inbound trips carrying food (subject to the resident check).
    pub food_returns: u64,
    /// Food-carrying returns that passed the resident check.
    pub successful_returns: u64,
    /// Raids launched against this nest.
    pub raids_received: u64,
    /// Raids against this nest that got through.
    pub successful_raids_received: u64,
}

/// Why a nest left the live population.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Food stock fell below zero.
    Starvation,
    /// Selected by the periodic mass-kill policy.
    MassKill,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::MassKill => "mass_kill",
        }
    }
}

/// State of a single worker, as handed to the recorder.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndividualRecord {
    pub nest_id: NestId,
    pub individual_id: IndividualId,
    pub birth_time: f64,
    pub next_action: f64,
    pub is_going: bool,
    pub is_foraging: bool,
    pub had_food: bool,
    pub neutral_gene: f64,
    pub cues: Vec<f64>,
}

/// Archived state of a nest that died, flushed on the output cadence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeadNestRecord {
    /// Simulated time at which the archive was flushed.
    pub flushed_at: f64,
    pub birth_time: f64,
    pub nest_id: NestId,
    pub mother_id: NestId,
    /// Food stock at the moment of death.
    pub stock: f64,
    pub cause: DeathCause,
    pub counters: ActionCounters,
    pub intercept: f64,
    pub slope: f64,
    pub offspring: u32,
    pub neutral_gene: f64,
    /// Bray-Curtis distance of the nest mean profile to the population mean
    /// worker profile at flush time. `None` when either profile sums to zero.
    pub distance_to_population: Option<f64>,
    pub mean_cues: Vec<f64>,
}
