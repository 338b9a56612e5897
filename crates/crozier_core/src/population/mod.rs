//! The population: every live nest, the global food stock, the event queue
//! and the clocks that drive the periodic demography.
//!
//! One `Population` runs one simulation. It is single-threaded and owns its
//! own [`RandomSource`], so replicates can run side by side.

mod food;
mod lifecycle;
mod registry;
mod report;
mod simulate;

pub use registry::NestRegistry;
pub use simulate::StepOutcome;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::nest::Nest;
use crate::rng::RandomSource;
use crate::scheduler::{Event, EventScheduler};
use crozier_data::{
    ActionCounters, DeathCause, LifecycleEvent, NestId, PopulationSnapshot, FOUNDER_MOTHER_ID,
};
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Reached the configured horizon.
    Completed,
    /// Ran out of live nests before the horizon.
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub seed: u64,
    pub final_time: f64,
    pub alive_nests: usize,
    pub events: u64,
    pub stale_events: u64,
    pub births: u64,
    pub starvation_deaths: u64,
    pub mass_kill_deaths: u64,
    pub counters: ActionCounters,
}

/// Simulation clocks, each holding the time an action last fired.
#[derive(Debug, Default, Clone, Copy)]
struct Clocks {
    mass_kill: f64,
    mass_reproduction: f64,
    snapshot: f64,
    dead_flush: f64,
    food_regen: f64,
    food_tick: f64,
}

/// A dead nest waiting for the next dead-nest flush.
#[derive(Debug, Clone)]
struct ArchivedNest {
    nest: Nest,
    cause: DeathCause,
}

pub struct Population {
    config: AppConfig,
    registry: NestRegistry,
    scheduler: EventScheduler,
    rng: RandomSource,
    next_nest_id: NestId,
    global_stock: f64,
    time: f64,
    clocks: Clocks,
    archive: Vec<ArchivedNest>,
    counters: ActionCounters,
    metrics: Metrics,
    pending_events: Vec<LifecycleEvent>,
    last_snapshot: Option<PopulationSnapshot>,
    outcome: Option<RunOutcome>,
}

impl Population {
    /// Validates the configuration and founds `colony_count` nests at time 0.
    pub fn new(config: AppConfig, rng: RandomSource) -> anyhow::Result<Self> {
        config.validate()?;
        let mut population = Self {
            metrics: Metrics::new(config.run.progress_interval),
            global_stock: config.food.init_food_stock,
            config,
            registry: NestRegistry::new(),
            scheduler: EventScheduler::new(),
            rng,
            next_nest_id: FOUNDER_MOTHER_ID + 1,
            time: 0.0,
            clocks: Clocks::default(),
            archive: Vec::new(),
            counters: ActionCounters::default(),
            pending_events: Vec::new(),
            last_snapshot: None,
            outcome: None,
        };
        for _ in 0..population.config.colony.colony_count {
            let id = population.allocate_nest_id();
            let nest = Nest::found(id, &population.config, 0.0, &mut population.rng)?;
            population.admit(nest);
        }
        tracing::info!(
            seed = population.rng.seed(),
            nests = population.registry.len(),
            workers = population.config.colony.worker_count,
            model = %population.config.recognition.model,
            tolerance = %population.config.recognition.tolerance,
            "Population founded"
        );
        Ok(population)
    }

    /// Seeds from `config.run.seed`, or from entropy when unset.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let rng = match config.run.seed {
            Some(seed) => RandomSource::from_seed(seed),
            None => RandomSource::from_entropy(),
        };
        Self::new(config, rng)
    }

    fn allocate_nest_id(&mut self) -> NestId {
        let id = self.next_nest_id;
        self.next_nest_id += 1;
        id
    }

    /// Registers a nest and schedules its workers' first actions.
    fn admit(&mut self, nest: Nest) {
        for worker in &nest.workers {
            self.scheduler.push(Event {
                time: worker.next_action,
                nest_id: nest.id,
                individual_id: worker.id,
            });
        }
        self.pending_events.push(LifecycleEvent::NestBorn {
            time: self.time,
            nest_id: nest.id,
            mother_id: nest.mother_id,
        });
        self.registry.insert(nest);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn global_stock(&self) -> f64 {
        self.global_stock
    }

    pub fn nests(&self) -> &[Nest] {
        self.registry.as_slice()
    }

    pub fn nest(&self, id: NestId) -> Option<&Nest> {
        self.registry.get(id)
    }

    pub fn alive_nests(&self) -> usize {
        self.registry.len()
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    /// Run-level action tallies.
    pub fn counters(&self) -> &ActionCounters {
        &self.counters
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Dead nests archived since the last flush.
    pub fn archived_dead_nests(&self) -> usize {
        self.archive.len()
    }

    /// Next ID that will be handed to a new nest.
    pub fn next_nest_id(&self) -> NestId {
        self.next_nest_id
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            outcome: self.outcome.unwrap_or(RunOutcome::Completed),
            seed: self.rng.seed(),
            final_time: self.time,
            alive_nests: self.registry.len(),
            events: self.metrics.events(),
            stale_events: self.metrics.stale_events(),
            births: self.metrics.births(),
            starvation_deaths: self.metrics.starvation_deaths(),
            mass_kill_deaths: self.metrics.mass_kill_deaths(),
            counters: self.counters,
        }
    }
}
