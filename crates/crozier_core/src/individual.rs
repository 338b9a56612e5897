//! A single worker: its cue profile, neutral marker and trip state.

use crate::config::{EvolutionConfig, Metric};
use crate::distance;
use crate::error::Result;
use crate::rng::RandomSource;
use crozier_data::{IndividualId, IndividualRecord, NestId};

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub id: IndividualId,
    pub nest_id: NestId,
    pub cues: Vec<f64>,
    pub neutral_gene: f64,
    pub birth_time: f64,
    pub next_action: f64,
    /// Outbound when true, returning home when false.
    pub is_going: bool,
    /// Current trip is a forage (true) or a raid (false).
    pub is_foraging: bool,
    /// Carrying food on the way home.
    pub had_food: bool,
}

impl Individual {
    /// A worker born at `now + U(0, 1)` whose cues and neutral gene are
    /// mutated copies of the nest's. Its first action happens at birth.
    pub fn new(
        id: IndividualId,
        nest_id: NestId,
        nest_mean: &[f64],
        nest_neutral: f64,
        evolution: &EvolutionConfig,
        now: f64,
        rng: &mut RandomSource,
    ) -> Self {
        let mut worker = Self {
            id,
            nest_id,
            cues: nest_mean.to_vec(),
            neutral_gene: nest_neutral,
            birth_time: now,
            next_action: now,
            is_going: true,
            is_foraging: false,
            had_food: false,
        };
        worker.mutate(evolution.mutation_bias, evolution.mutation_strength, rng);
        worker.birth_time = now + rng.unit();
        worker.next_action = worker.birth_time;
        worker
    }

    /// Gaussian perturbation of every cue (floored at zero) and of the
    /// neutral gene.
    pub fn mutate(&mut self, bias: f64, strength: f64, rng: &mut RandomSource) {
        for cue in &mut self.cues {
            *cue = (*cue + rng.normal(bias, strength)).max(0.0);
        }
        self.neutral_gene += rng.normal(bias, strength);
    }

    /// Distance from this worker's own cues to `other`.
    pub fn distance_to(&self, metric: Metric, other: &[f64]) -> Result<f64> {
        distance::distance(metric, &self.cues, other)
    }

    /// Starts a trip away from the nest.
    pub fn depart(&mut self, foraging: bool) {
        self.is_going = false;
        self.is_foraging = foraging;
        self.had_food = false;
    }

    /// Back home (or turned away at the door); the next action is a departure.
    pub fn arrive(&mut self) {
        self.is_going = true;
        self.had_food = false;
    }

    pub fn record(&self) -> IndividualRecord {
        IndividualRecord {
            nest_id: self.nest_id,
            individual_id: self.id,
            birth_time: self.birth_time,
            next_action: self.next_action,
            is_going: self.is_going,
            is_foraging: self.is_foraging,
            had_food: self.had_food,
            neutral_gene: self.neutral_gene,
            cues: self.cues.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evolution(strength: f64) -> EvolutionConfig {
        EvolutionConfig {
            mutation_strength: strength,
            ..Default::default()
        }
    }

    #[test]
    fn test_birth_jitter_within_unit_interval() {
        let mut rng = RandomSource::from_seed(11);
        for id in 0..50 {
            let w = Individual::new(id, 1, &[1.0, 2.0], 0.0, &evolution(0.1), 10.0, &mut rng);
            assert!(w.birth_time >= 10.0 && w.birth_time < 11.0);
            assert_eq!(w.next_action, w.birth_time);
            assert!(w.is_going);
            assert!(!w.had_food);
        }
    }

    #[test]
    fn test_zero_strength_copies_nest() {
        let mut rng = RandomSource::from_seed(12);
        let w = Individual::new(0, 3, &[1.5, 0.5], 0.25, &evolution(0.0), 0.0, &mut rng);
        assert_eq!(w.cues, vec![1.5, 0.5]);
        assert_eq!(w.neutral_gene, 0.25);
        assert_eq!(w.nest_id, 3);
    }

    #[test]
    fn test_mutation_never_negative() {
        let mut rng = RandomSource::from_seed(13);
        let mut w = Individual::new(0, 1, &[0.0, 0.01, 0.0], 0.0, &evolution(0.0), 0.0, &mut rng);
        for _ in 0..200 {
            w.mutate(-0.5, 1.0, &mut rng);
            assert!(w.cues.iter().all(|c| *c >= 0.0));
        }
    }

    #[test]
    fn test_trip_state_transitions() {
        let mut rng = RandomSource::from_seed(14);
        let mut w = Individual::new(0, 1, &[1.0], 0.0, &evolution(0.0), 0.0, &mut rng);
        w.depart(false);
        assert!(!w.is_going && !w.is_foraging && !w.had_food);
        w.had_food = true;
        w.arrive();
        assert!(w.is_going && !w.had_food);
    }

    #[test]
    fn test_self_distance_gestalt() {
        let mut rng = RandomSource::from_seed(15);
        let w = Individual::new(0, 1, &[1.0, 2.0], 0.0, &evolution(0.0), 0.0, &mut rng);
        let d = w.distance_to(Metric::Gestalt, &[1.0, 2.0]).unwrap();
        assert!(d.abs() < 1e-12);
    }
}
