use super::colony::{ActionCounters, IndividualRecord};
use serde::{Deserialize, Serialize};

/// Mean and (population) standard deviation of a sample.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

/// One row of the evolution table: aggregate state of the live population.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PopulationSnapshot {
    /// Simulated time of the snapshot.
    pub time: f64,
    /// Global (foraging) food stock.
    pub global_stock: f64,
    /// Number of nests alive.
    pub alive_nests: usize,
    /// Pairwise Bray-Curtis dissimilarity between nest mean profiles.
    pub nest_bray_curtis: MeanStd,
    /// Pairwise Bray-Curtis dissimilarity between all worker profiles.
    pub worker_bray_curtis: MeanStd,
    /// Shannon diversity of each nest mean profile.
    pub nest_shannon: MeanStd,
    /// Simpson diversity of each nest mean profile.
    pub nest_simpson: MeanStd,
    /// Shannon diversity of each worker profile.
    pub worker_shannon: MeanStd,
    /// Simpson diversity of each worker profile.
    pub worker_simpson: MeanStd,
    /// Within-nest correlation of neutral genes between two random workers.
    pub relatedness: Option<f64>,
    pub neutral_gene: MeanStd,
    pub intercept: MeanStd,
    pub slope: MeanStd,
    /// Total cue abundance of each nest.
    pub cue_abundance: MeanStd,
    pub offspring: MeanStd,
    pub offspring_simpson: f64,
    pub offspring_shannon: f64,
    /// Age of each nest.
    pub age: MeanStd,
    pub max_age: f64,
    pub min_age: f64,
    /// Run-level action counters at snapshot time.
    pub counters: ActionCounters,
}

/// Everything handed to the recorder once the run is over.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FinalState {
    pub current: PopulationSnapshot,
    /// The last snapshot emitted on the regular output cadence, if any.
    pub last_emitted: Option<PopulationSnapshot>,
    /// Sampled worker records.
    pub individuals: Vec<IndividualRecord>,
}
