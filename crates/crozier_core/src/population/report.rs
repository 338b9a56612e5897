//! Aggregate views of the live population for the recorder.

use super::Population;
use crate::error::Result;
use crate::stats;
use crozier_data::{DeadNestRecord, FinalState, IndividualRecord, PopulationSnapshot};

impl Population {
    /// Statistics over the live population at the current time.
    ///
    /// Relatedness draws two distinct workers per nest, so this advances the
    /// random stream.
    pub fn snapshot(&mut self) -> Result<PopulationSnapshot> {
        let now = self.time;
        let nests = self.registry.as_slice();

        let nest_profiles: Vec<&[f64]> = nests.iter().map(|n| n.mean_cues.as_slice()).collect();
        let worker_profiles: Vec<&[f64]> = nests
            .iter()
            .flat_map(|n| n.workers.iter().map(|w| w.cues.as_slice()))
            .collect();

        let nest_shannon: Vec<f64> = nest_profiles.iter().map(|p| stats::shannon(p)).collect();
        let nest_simpson: Vec<f64> = nest_profiles.iter().map(|p| stats::simpson(p)).collect();
        let worker_shannon: Vec<f64> = worker_profiles.iter().map(|p| stats::shannon(p)).collect();
        let worker_simpson: Vec<f64> = worker_profiles.iter().map(|p| stats::simpson(p)).collect();

        let neutral: Vec<f64> = nests.iter().map(|n| n.neutral_gene).collect();
        let intercepts: Vec<f64> = nests.iter().map(|n| n.intercept).collect();
        let slopes: Vec<f64> = nests.iter().map(|n| n.slope).collect();
        let abundance: Vec<f64> = nests.iter().map(|n| n.total_abundance).collect();
        let offspring: Vec<f64> = nests.iter().map(|n| f64::from(n.offspring)).collect();
        let ages: Vec<f64> = nests.iter().map(|n| n.age(now)).collect();

        let mut first = Vec::with_capacity(nests.len());
        let mut second = Vec::with_capacity(nests.len());
        for nest in nests {
            if nest.workers.len() < 2 {
                continue;
            }
            let a = self.rng.uniform_int(0, nest.workers.len())?;
            let mut b = self.rng.uniform_int(0, nest.workers.len())?;
            while b == a {
                b = self.rng.uniform_int(0, nest.workers.len())?;
            }
            first.push(nest.workers[a].neutral_gene);
            second.push(nest.workers[b].neutral_gene);
        }

        let (max_age, min_age) = if ages.is_empty() {
            (0.0, 0.0)
        } else {
            (
                ages.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                ages.iter().copied().fold(f64::INFINITY, f64::min),
            )
        };

        Ok(PopulationSnapshot {
            time: now,
            global_stock: self.global_stock,
            alive_nests: nests.len(),
            nest_bray_curtis: stats::pairwise_bray_curtis(&nest_profiles),
            worker_bray_curtis: stats::pairwise_bray_curtis(&worker_profiles),
            nest_shannon: stats::mean_std(&nest_shannon),
            nest_simpson: stats::mean_std(&nest_simpson),
            worker_shannon: stats::mean_std(&worker_shannon),
            worker_simpson: stats::mean_std(&worker_simpson),
            relatedness: stats::correlation(&first, &second),
            neutral_gene: stats::mean_std(&neutral),
            intercept: stats::mean_std(&intercepts),
            slope: stats::mean_std(&slopes),
            cue_abundance: stats::mean_std(&abundance),
            offspring: stats::mean_std(&offspring),
            offspring_simpson: stats::simpson(&offspring),
            offspring_shannon: stats::shannon(&offspring),
            age: stats::mean_std(&ages),
            max_age,
            min_age,
            counters: self.counters,
        })
    }

    /// Mean cue profile over every live worker.
    pub fn mean_worker_profile(&self) -> Vec<f64> {
        stats::mean_profile(
            self.registry
                .iter()
                .flat_map(|n| n.workers.iter().map(|w| w.cues.as_slice())),
            self.config.colony.cue_count,
        )
    }

    /// Drains the dead-nest archive into records stamped with the current
    /// time and each nest's distance to the live population.
    pub fn drain_dead_nests(&mut self) -> Vec<DeadNestRecord> {
        if self.archive.is_empty() {
            return Vec::new();
        }
        let population_mean = self.mean_worker_profile();
        let now = self.time;
        self.archive
            .drain(..)
            .map(|archived| {
                let nest = archived.nest;
                DeadNestRecord {
                    flushed_at: now,
                    birth_time: nest.birth_time,
                    nest_id: nest.id,
                    mother_id: nest.mother_id,
                    stock: nest.stock,
                    cause: archived.cause,
                    counters: nest.counters,
                    intercept: nest.intercept,
                    slope: nest.slope,
                    offspring: nest.offspring,
                    neutral_gene: nest.neutral_gene,
                    distance_to_population: stats::bray_curtis(&nest.mean_cues, &population_mean),
                    mean_cues: nest.mean_cues,
                }
            })
            .collect()
    }

    /// Every live worker.
    pub fn individual_records(&self) -> Vec<IndividualRecord> {
        self.registry
            .iter()
            .flat_map(|n| n.workers.iter().map(|w| w.record()))
            .collect()
    }

    /// Closing state: a fresh snapshot, the last emitted one and a random
    /// sample of `final_individual_fraction` of the live workers.
    pub fn final_state(&mut self) -> Result<FinalState> {
        let current = self.snapshot()?;
        let records = self.individual_records();
        let keep = (records.len() as f64 * self.config.output.final_individual_fraction).round()
            as usize;
        let individuals = self.rng.random_subset(&records, keep);
        Ok(FinalState {
            current,
            last_emitted: self.last_snapshot.clone(),
            individuals,
        })
    }
}
