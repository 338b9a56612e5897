//! Nest deaths and births: starvation, the periodic mass kill and the
//! reproduction routes that refill the population.

use super::{ArchivedNest, Population};
use crate::config::KillMode;
use crate::error::{Result, SimError};
use crate::nest::Nest;
use crozier_data::{DeathCause, LifecycleEvent, NestId};

impl Population {
    /// Kills `id` if its stock went negative. Returns whether it died.
    pub(super) fn check_nest(&mut self, id: NestId) -> Result<bool> {
        let starving = self.registry.get(id).is_some_and(Nest::is_starving);
        if starving {
            self.kill_nest(id)?;
        }
        Ok(starving)
    }

    /// Starvation death, followed by a single replacement when individual
    /// reproduction is enabled.
    pub(super) fn kill_nest(&mut self, id: NestId) -> Result<()> {
        if self.remove_nest(id, DeathCause::Starvation) {
            self.metrics.record_starvation();
            if self.config.demography.repro_mode.allows_individual() {
                self.reproduce_nest()?;
            }
        }
        Ok(())
    }

    /// Takes a nest out of the live population, archiving it with
    /// probability `frac_dead_nests_recorded`.
    pub(super) fn remove_nest(&mut self, id: NestId, cause: DeathCause) -> bool {
        let Some(mut nest) = self.registry.remove(id) else {
            return false;
        };
        let archived = self
            .rng
            .bernoulli(self.config.demography.frac_dead_nests_recorded);
        tracing::debug!(
            nest_id = id,
            cause = cause.as_str(),
            stock = nest.stock,
            time = self.time,
            "Nest died"
        );
        self.pending_events.push(LifecycleEvent::NestDied {
            time: self.time,
            nest_id: id,
            cause,
            stock: nest.stock,
            age: nest.age(self.time),
            archived,
        });
        if archived {
            nest.workers.clear();
            self.archive.push(ArchivedNest { nest, cause });
        }
        true
    }

    /// One daughter from a stock-weighted mother, if below the target count.
    pub(super) fn reproduce_nest(&mut self) -> Result<bool> {
        if self.registry.is_empty()
            || self.registry.len() >= self.config.colony.colony_count
        {
            return Ok(false);
        }
        let weights: Vec<f64> = self
            .registry
            .iter()
            .map(|n| n.stock.max(0.0))
            .collect();
        let slot = self.rng.weighted_index(&weights).map_err(|e| {
            SimError::degenerate(format!("cannot choose a mother nest: {e}"))
        })?;

        let id = self.allocate_nest_id();
        let mother = &self.registry.as_slice()[slot];
        let mother_id = mother.id;
        let daughter = Nest::from_mother(id, mother, &self.config, self.time, &mut self.rng);
        if let Some(mother) = self.registry.get_mut(mother_id) {
            mother.offspring += 1;
        }
        tracing::debug!(nest_id = id, mother_id, time = self.time, "Nest born");
        self.metrics.record_birth();
        self.admit(daughter);
        Ok(true)
    }

    /// Periodic culling by the configured kill mode.
    pub(super) fn mass_kill(&mut self) -> Result<()> {
        if self.time - self.clocks.mass_kill < self.config.demography.removal_interval {
            return Ok(());
        }
        self.clocks.mass_kill = self.time;

        let to_kill = self.kill_count();
        if to_kill == 0 || self.registry.is_empty() {
            return Ok(());
        }
        let victims = match self.config.demography.kill_mode {
            KillMode::Disabled => return Ok(()),
            KillMode::Random => {
                let ids = self.registry.ids();
                self.rng.random_subset(&ids, to_kill)
            }
            KillMode::Sorted => {
                let mut sorted = self.registry.stocks();
                sorted.sort_by(f64::total_cmp);
                let threshold = sorted[to_kill.min(sorted.len()) - 1];
                self.registry
                    .iter()
                    .filter(|n| n.stock <= threshold)
                    .map(|n| n.id)
                    .collect()
            }
        };

        let mut killed = 0;
        for id in victims {
            if self.remove_nest(id, DeathCause::MassKill) {
                killed += 1;
            }
        }
        self.metrics.record_mass_kill(killed);
        tracing::debug!(
            time = self.time,
            killed,
            survivors = self.registry.len(),
            "Mass kill"
        );
        self.pending_events.push(LifecycleEvent::MassKill {
            time: self.time,
            killed,
            survivors: self.registry.len(),
        });
        Ok(())
    }

    /// `floor(frac_killed * colony_count)`, less the nests already missing
    /// unless both reproduction routes are on.
    pub(super) fn kill_count(&self) -> usize {
        let colony_count = self.config.colony.colony_count;
        let quota = (self.config.demography.frac_killed * colony_count as f64).floor() as usize;
        if self.config.demography.repro_mode.allows_individual()
            && self.config.demography.repro_mode.allows_mass()
        {
            return quota;
        }
        let already_dead = colony_count.saturating_sub(self.registry.len());
        quota.saturating_sub(already_dead)
    }

    /// Periodic refill up to `colony_count`, optionally resetting every stock.
    pub(super) fn mass_reproduce(&mut self) -> Result<()> {
        if self.time - self.clocks.mass_reproduction < self.config.demography.removal_interval {
            return Ok(());
        }
        self.clocks.mass_reproduction = self.time;
        if !self.config.demography.repro_mode.allows_mass() {
            return Ok(());
        }

        let mut born = 0;
        while self.reproduce_nest()? {
            born += 1;
        }
        let food_reset = self.config.demography.food_reset;
        if food_reset {
            let init_stock = self.config.colony.init_nest_stock;
            for nest in self.registry.iter_mut() {
                nest.stock = init_stock;
            }
            self.global_stock = self.config.food.init_food_stock;
        }
        tracing::debug!(time = self.time, born, food_reset, "Mass reproduction");
        self.pending_events.push(LifecycleEvent::MassReproduction {
            time: self.time,
            born,
            food_reset,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{AppConfig, KillMode, ReproMode};
    use crate::population::Population;
    use crate::rng::RandomSource;
    use crozier_data::LifecycleEvent;

    fn population(kill_mode: KillMode, repro_mode: ReproMode) -> Population {
        let mut config = AppConfig::default();
        config.colony.colony_count = 10;
        config.colony.worker_count = 2;
        config.demography.kill_mode = kill_mode;
        config.demography.repro_mode = repro_mode;
        config.demography.frac_killed = 0.3;
        config.demography.removal_interval = 5.0;
        Population::new(config, RandomSource::from_seed(51)).unwrap()
    }

    #[test]
    fn test_mass_kill_waits_for_interval() {
        let mut pop = population(KillMode::Random, ReproMode::Disabled);
        pop.time = 4.9;
        pop.mass_kill().unwrap();
        assert_eq!(pop.alive_nests(), 10);
        pop.time = 5.0;
        pop.mass_kill().unwrap();
        assert_eq!(pop.alive_nests(), 7);
    }

    #[test]
    fn test_kill_count_accounts_for_missing_nests() {
        let mut pop = population(KillMode::Random, ReproMode::Mass);
        let id = pop.nests()[0].id;
        pop.remove_nest(id, crozier_data::DeathCause::Starvation);
        assert_eq!(pop.kill_count(), 2);

        let mut both = population(KillMode::Random, ReproMode::Both);
        let id = both.nests()[0].id;
        both.remove_nest(id, crozier_data::DeathCause::Starvation);
        assert_eq!(both.kill_count(), 3);
    }

    #[test]
    fn test_sorted_kill_includes_ties() {
        let mut pop = population(KillMode::Sorted, ReproMode::Disabled);
        let stocks = [1.0, 1.0, 1.0, 1.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        for (nest, stock) in pop.registry.iter_mut().zip(stocks) {
            nest.stock = stock;
        }
        pop.time = 5.0;
        pop.mass_kill().unwrap();
        // Quota is 3 but four nests share the threshold stock.
        assert_eq!(pop.alive_nests(), 6);
        assert!(pop.nests().iter().all(|n| n.stock > 1.0));
    }

    #[test]
    fn test_mass_reproduce_refills_and_resets() {
        let mut pop = population(KillMode::Random, ReproMode::Mass);
        pop.config.demography.food_reset = true;
        pop.time = 5.0;
        pop.mass_kill().unwrap();
        assert_eq!(pop.alive_nests(), 7);
        for nest in pop.registry.iter_mut() {
            nest.stock = 3.0;
        }
        pop.global_stock = 1.0;
        pop.mass_reproduce().unwrap();
        assert_eq!(pop.alive_nests(), 10);
        assert!(pop.nests().iter().all(|n| n.stock == 25.0));
        assert_eq!(pop.global_stock, 300.0);
        assert!(pop
            .pending_events
            .iter()
            .any(|e| matches!(e, LifecycleEvent::MassReproduction { born: 3, .. })));
    }

    #[test]
    fn test_starvation_triggers_single_replacement() {
        let mut pop = population(KillMode::Disabled, ReproMode::Individual);
        let victim = pop.nests()[0].id;
        pop.registry.get_mut(victim).unwrap().stock = -0.5;
        assert!(pop.check_nest(victim).unwrap());
        assert_eq!(pop.alive_nests(), 10);
        assert!(pop.nest(victim).is_none());
        assert_eq!(pop.next_nest_id(), 12);
    }

    #[test]
    fn test_all_zero_stocks_cannot_pick_mother() {
        let mut pop = population(KillMode::Disabled, ReproMode::Individual);
        let victim = pop.nests()[0].id;
        for nest in pop.registry.iter_mut() {
            nest.stock = 0.0;
        }
        pop.registry.get_mut(victim).unwrap().stock = -1.0;
        assert!(pop.check_nest(victim).is_err());
    }

    #[test]
    fn test_daughter_increments_mother_offspring() {
        let mut pop = population(KillMode::Disabled, ReproMode::Individual);
        let first = pop.nests()[0].id;
        for nest in pop.registry.iter_mut() {
            nest.stock = if nest.id == first { 10.0 } else { 0.0 };
        }
        let victim = pop.nests()[1].id;
        pop.registry.get_mut(victim).unwrap().stock = -1.0;
        pop.check_nest(victim).unwrap();
        let daughter = pop.nests().iter().find(|n| n.id == 11).unwrap();
        assert_eq!(daughter.mother_id, first);
        assert_eq!(pop.nest(first).unwrap().offspring, 1);
    }
}
