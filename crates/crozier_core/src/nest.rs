//! A colony: its mean cue profile, tolerance genes, food stock and workers.
//!
//! The nest decides encounters at its entrance. Both encounter checks pick
//! an evaluating worker first, measure a distance with the configured
//! recognition model and turn it into a tolerance through the configured
//! tolerance curve. They return `!bernoulli(tolerance)`.

use crate::config::{AppConfig, ColonyConfig, EvolutionConfig, RecognitionConfig, ToleranceModel};
use crate::distance;
use crate::error::{Result, SimError};
use crate::individual::Individual;
use crate::rng::RandomSource;
use crozier_data::{ActionCounters, IndividualId, NestId, FOUNDER_MOTHER_ID};

#[derive(Debug, Clone, PartialEq)]
pub struct Nest {
    pub id: NestId,
    pub mother_id: NestId,
    pub workers: Vec<Individual>,
    pub mean_cues: Vec<f64>,
    pub neutral_gene: f64,
    /// Sum of `mean_cues`.
    pub total_abundance: f64,
    pub stock: f64,
    pub intercept: f64,
    pub slope: f64,
    pub birth_time: f64,
    /// Time of the last metabolic update.
    pub last_action: f64,
    pub offspring: u32,
    pub counters: ActionCounters,
    next_worker_id: IndividualId,
}

impl Nest {
    /// Founding nest: cues from an exponential distribution, genes around
    /// the configured baselines.
    pub fn found(id: NestId, config: &AppConfig, now: f64, rng: &mut RandomSource) -> Result<Self> {
        let colony = &config.colony;
        let evo = &config.evolution;
        let mean_cues = (0..colony.cue_count)
            .map(|_| rng.exponential(colony.cue_exp_rate))
            .collect::<Result<Vec<_>>>()?;
        let neutral_gene = rng.normal(evo.mutation_bias, evo.mutation_strength_cues);
        let intercept = rng.normal(evo.init_intercept, evo.mutation_strength);
        let slope = rng.normal(evo.init_slope, evo.mutation_strength);

        let mut nest = Self::empty(id, FOUNDER_MOTHER_ID, mean_cues, neutral_gene, colony, now);
        nest.intercept = intercept;
        nest.slope = slope;
        nest.spawn_workers(colony.worker_count, evo, now, rng);
        Ok(nest)
    }

    /// Daughter of `mother`: mutated copy of the mother's cues and neutral
    /// gene. Tolerance genes are inherited with noise while coevolution is
    /// active, otherwise redrawn around the baselines.
    pub fn from_mother(
        id: NestId,
        mother: &Nest,
        config: &AppConfig,
        now: f64,
        rng: &mut RandomSource,
    ) -> Self {
        let colony = &config.colony;
        let evo = &config.evolution;
        let mut nest = Self::empty(
            id,
            mother.id,
            mother.mean_cues.clone(),
            mother.neutral_gene,
            colony,
            now,
        );
        nest.mutate(evo.mutation_bias, evo.mutation_strength_cues, rng);
        if evo.coevolving_at(now) {
            nest.intercept = mother.intercept + rng.normal(evo.mutation_bias, evo.mutation_strength);
            nest.slope = mother.slope + rng.normal(evo.mutation_bias, evo.mutation_strength);
        } else {
            nest.intercept = rng.normal(evo.init_intercept, evo.mutation_strength);
            nest.slope = rng.normal(evo.init_slope, evo.mutation_strength);
        }
        nest.spawn_workers(colony.worker_count, evo, now, rng);
        nest
    }

    fn empty(
        id: NestId,
        mother_id: NestId,
        mean_cues: Vec<f64>,
        neutral_gene: f64,
        colony: &ColonyConfig,
        now: f64,
    ) -> Self {
        let mut nest = Self {
            id,
            mother_id,
            workers: Vec::with_capacity(colony.worker_count),
            mean_cues,
            neutral_gene,
            total_abundance: 0.0,
            stock: colony.init_nest_stock,
            intercept: 0.0,
            slope: 0.0,
            birth_time: now,
            last_action: now,
            offspring: 0,
            counters: ActionCounters::default(),
            next_worker_id: 0,
        };
        nest.recompute_abundance();
        nest
    }

    pub fn spawn_workers(
        &mut self,
        count: usize,
        evolution: &EvolutionConfig,
        now: f64,
        rng: &mut RandomSource,
    ) {
        for _ in 0..count {
            let worker = Individual::new(
                self.next_worker_id,
                self.id,
                &self.mean_cues,
                self.neutral_gene,
                evolution,
                now,
                rng,
            );
            self.next_worker_id += 1;
            self.workers.push(worker);
        }
    }

    /// Gaussian noise on every mean cue (floored at zero) and on the neutral
    /// gene.
    pub fn mutate(&mut self, bias: f64, strength: f64, rng: &mut RandomSource) {
        for cue in &mut self.mean_cues {
            *cue = (*cue + rng.normal(bias, strength)).max(0.0);
        }
        self.neutral_gene += rng.normal(bias, strength);
        self.recompute_abundance();
    }

    pub fn recompute_abundance(&mut self) {
        self.total_abundance = self.mean_cues.iter().sum();
    }

    /// Passive regeneration since the last update minus one action's upkeep.
    pub fn apply_metabolic_cost(&mut self, colony: &ColonyConfig, now: f64) {
        let regen = (now - self.last_action) * colony.nest_stock_rate;
        let upkeep =
            colony.metabolic_cost * self.total_abundance / 2000.0 / colony.worker_count as f64;
        self.stock += regen - upkeep;
        self.last_action = now;
    }

    pub fn is_starving(&self) -> bool {
        self.stock < 0.0
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.birth_time
    }

    pub fn worker_index(&self, id: IndividualId) -> Option<usize> {
        match self.workers.get(id as usize) {
            Some(w) if w.id == id => Some(id as usize),
            _ => self.workers.iter().position(|w| w.id == id),
        }
    }

    /// Maps a distance to an acceptance probability in `[0, 1]`.
    pub fn tolerance(&self, distance: f64, model: ToleranceModel, rng: &mut RandomSource) -> f64 {
        let raw = match model {
            ToleranceModel::Linear => self.intercept + self.slope * distance,
            ToleranceModel::Logistic => 1.0 / (1.0 + (self.intercept + distance * self.slope).exp()),
            ToleranceModel::Control => rng.unit(),
        };
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }

    /// Encounter between a random resident and a foreign worker carrying
    /// `profile`. Returns `true` when the intruder gets through, which
    /// happens with probability `1 - tolerance`.
    pub fn check_intruder(
        &self,
        profile: &[f64],
        recognition: &RecognitionConfig,
        rng: &mut RandomSource,
    ) -> Result<bool> {
        let evaluator = rng.uniform_int(0, self.workers.len())?;
        self.encounter(&self.workers[evaluator], profile, recognition, rng)
    }

    /// Encounter between a returning worker and a different resident.
    /// Returns `true` when the worker is let back in.
    pub fn check_resident(
        &self,
        resident: &Individual,
        recognition: &RecognitionConfig,
        rng: &mut RandomSource,
    ) -> Result<bool> {
        if self.workers.len() < 2 {
            return Err(SimError::invalid(format!(
                "nest {} has no second worker to check a returning resident",
                self.id
            )));
        }
        let mut evaluator = rng.uniform_int(0, self.workers.len())?;
        while self.workers[evaluator].id == resident.id {
            evaluator = rng.uniform_int(0, self.workers.len())?;
        }
        self.encounter(&self.workers[evaluator], &resident.cues, recognition, rng)
    }

    fn encounter(
        &self,
        evaluator: &Individual,
        profile: &[f64],
        recognition: &RecognitionConfig,
        rng: &mut RandomSource,
    ) -> Result<bool> {
        let Some(metric) = recognition.model.metric() else {
            return Ok(rng.bernoulli(0.5));
        };
        let template = if recognition.model.uses_individual_template() {
            &evaluator.cues
        } else {
            &self.mean_cues
        };
        let d = distance::distance(metric, template, profile)?;
        let tolerance = self.tolerance(d, recognition.tolerance, rng);
        Ok(!rng.bernoulli(tolerance))
    }
}
