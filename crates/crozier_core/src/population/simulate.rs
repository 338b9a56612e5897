//! The event loop.
//!
//! Each step runs the periodic demography and output, pops the earliest
//! worker action, and carries it out: a departure (forage or raid) or a
//! return home. Stock changes are followed by a death check on the nest
//! that lost food.

use super::{Population, RunOutcome, RunSummary};
use crate::error::{Result, SimError};
use crate::individual::Individual;
use crate::recorder::Recorder;
use crate::scheduler::Event;
use crozier_data::{ActionCounters, LifecycleEvent, NestId};

/// Result of a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Finished(RunOutcome),
}

impl Population {
    /// Runs until the horizon or until the population collapses, then hands
    /// the final state to `recorder`.
    pub fn simulate(&mut self, recorder: &mut dyn Recorder) -> anyhow::Result<RunSummary> {
        tracing::info!(
            seed = self.rng.seed(),
            horizon = self.config.run.horizon,
            nests = self.registry.len(),
            fingerprint = %self.config.fingerprint(),
            "Simulation started"
        );
        self.flush_events(recorder)?;

        while let StepOutcome::Continue = self.step(recorder)? {}

        let state = self.final_state()?;
        recorder.on_finish(&state)?;
        let summary = self.summary();
        tracing::info!(
            outcome = ?summary.outcome,
            time = summary.final_time,
            events = summary.events,
            alive_nests = summary.alive_nests,
            births = summary.births,
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Simulation finished"
        );
        Ok(summary)
    }

    /// One loop iteration.
    pub fn step(&mut self, recorder: &mut dyn Recorder) -> anyhow::Result<StepOutcome> {
        if let Some(outcome) = self.outcome {
            return Ok(StepOutcome::Finished(outcome));
        }
        if self.time >= self.config.run.horizon {
            self.outcome = Some(RunOutcome::Completed);
            return Ok(StepOutcome::Finished(RunOutcome::Completed));
        }
        if self.scheduler.is_empty() || self.registry.is_empty() {
            tracing::warn!(time = self.time, "Population collapsed before the horizon");
            self.pending_events.push(LifecycleEvent::Collapse { time: self.time });
            self.flush_events(recorder)?;
            self.outcome = Some(RunOutcome::Collapsed);
            return Ok(StepOutcome::Finished(RunOutcome::Collapsed));
        }

        self.mass_kill()?;
        self.mass_reproduce()?;
        self.emit_output(recorder)?;
        self.flush_events(recorder)?;
        if self.registry.is_empty() {
            return Ok(StepOutcome::Continue);
        }

        let event = self.scheduler.pop_min()?;
        self.time = event.time;
        self.regenerate_food();

        let resolved = self
            .registry
            .get(event.nest_id)
            .and_then(|nest| nest.worker_index(event.individual_id));
        let Some(slot) = resolved else {
            self.metrics.record_stale();
            return Ok(StepOutcome::Continue);
        };

        self.act(event.nest_id, slot)?;
        self.metrics
            .record_event(self.time, self.registry.len(), self.global_stock);
        self.flush_events(recorder)?;
        Ok(StepOutcome::Continue)
    }

    /// Carries out the action of worker `slot` of nest `home`.
    fn act(&mut self, home: NestId, slot: usize) -> Result<()> {
        let delay = self.rng.exponential(self.config.run.action_rate)?;
        let now = self.time;
        let nest = self
            .registry
            .get_mut(home)
            .ok_or_else(|| SimError::invalid(format!("nest {home} is not alive")))?;
        nest.apply_metabolic_cost(&self.config.colony, now);
        let worker = &mut nest.workers[slot];
        worker.next_action = now + delay;
        let outbound = worker.is_going;
        self.tally(home, |c| c.actions += 1);

        if outbound {
            self.depart(home, slot)?;
        } else {
            self.return_home(home, slot)?;
        }

        let worker = self.worker(home, slot)?;
        let next = Event {
            time: worker.next_action,
            nest_id: home,
            individual_id: worker.id,
        };
        self.scheduler.push(next);
        self.check_nest(home)?;
        Ok(())
    }

    /// Outbound worker: forage from the global stock or raid another nest.
    fn depart(&mut self, home: NestId, slot: usize) -> Result<()> {
        self.tally(home, |c| c.departures += 1);
        let raid = self.rng.bernoulli(self.steal_probability());

        if !raid {
            self.global_stock -= 1.0;
            self.tally(home, |c| c.successful_forages += 1);
            let worker = self.worker_mut(home, slot)?;
            worker.depart(true);
            worker.had_food = true;
            return Ok(());
        }

        let target_id = self.pick_target(home)?;
        let cues = self.worker(home, slot)?.cues.clone();
        let target = self
            .registry
            .get(target_id)
            .ok_or_else(|| SimError::invalid(format!("raid target {target_id} is not alive")))?;
        let got_through = target.check_intruder(&cues, &self.config.recognition, &mut self.rng)?;

        self.tally(home, |c| c.steals += 1);
        self.tally(target_id, |c| c.raids_received += 1);
        if got_through {
            if let Some(target) = self.registry.get_mut(target_id) {
                target.stock -= 1.0;
            }
            self.tally(target_id, |c| c.successful_raids_received += 1);
            self.tally(home, |c| c.successful_steals += 1);
        }
        let worker = self.worker_mut(home, slot)?;
        worker.depart(false);
        worker.had_food = got_through;

        if got_through {
            self.check_nest(target_id)?;
        }
        Ok(())
    }

    /// Inbound worker: a loaded worker must pass a resident to deliver.
    fn return_home(&mut self, home: NestId, slot: usize) -> Result<()> {
        let resident = self.worker(home, slot)?.clone();
        if resident.had_food {
            let nest = self
                .registry
                .get(home)
                .ok_or_else(|| SimError::invalid(format!("nest {home} is not alive")))?;
            let accepted =
                nest.check_resident(&resident, &self.config.recognition, &mut self.rng)?;
            self.tally(home, |c| c.food_returns += 1);
            if accepted {
                if let Some(nest) = self.registry.get_mut(home) {
                    nest.stock += 1.0;
                }
                self.tally(home, |c| c.successful_returns += 1);
            }
        }
        self.tally(home, |c| c.returns += 1);
        self.worker_mut(home, slot)?.arrive();
        Ok(())
    }

    /// Applies `apply` to both the run tallies and nest `id`'s tallies.
    fn tally(&mut self, id: NestId, apply: impl Fn(&mut ActionCounters)) {
        apply(&mut self.counters);
        if let Some(nest) = self.registry.get_mut(id) {
            apply(&mut nest.counters);
        }
    }

    fn worker(&self, nest: NestId, slot: usize) -> Result<&Individual> {
        self.registry
            .get(nest)
            .and_then(|n| n.workers.get(slot))
            .ok_or_else(|| missing_worker(nest, slot))
    }

    fn worker_mut(&mut self, nest: NestId, slot: usize) -> Result<&mut Individual> {
        self.registry
            .get_mut(nest)
            .and_then(|n| n.workers.get_mut(slot))
            .ok_or_else(|| missing_worker(nest, slot))
    }

    /// Snapshot and dead-nest flush, each at most once per output interval.
    fn emit_output(&mut self, recorder: &mut dyn Recorder) -> anyhow::Result<()> {
        let interval = self.config.output.output_interval;
        if self.time - self.clocks.snapshot >= interval {
            let snapshot = self.snapshot()?;
            recorder.on_snapshot(&snapshot)?;
            self.last_snapshot = Some(snapshot);
            self.clocks.snapshot = self.time;
        }
        if self.time - self.clocks.dead_flush >= interval {
            let records = self.drain_dead_nests();
            if !records.is_empty() {
                recorder.on_dead_nests(self.time, &records)?;
            }
            self.clocks.dead_flush = self.time;
        }
        Ok(())
    }

    fn flush_events(&mut self, recorder: &mut dyn Recorder) -> anyhow::Result<()> {
        for event in self.pending_events.drain(..) {
            recorder.on_event(&event)?;
        }
        Ok(())
    }
}

fn missing_worker(nest: NestId, slot: usize) -> SimError {
    SimError::invalid(format!("nest {nest} has no worker in slot {slot}"))
}

#[cfg(test)]
mod tests {
    use super::StepOutcome;
    use crate::config::{AppConfig, KillMode, ReproMode};
    use crate::population::{Population, RunOutcome};
    use crate::recorder::MemoryRecorder;
    use crate::rng::RandomSource;
    use crozier_data::{ActionCounters, DeathCause};

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.colony.colony_count = 4;
        config.colony.worker_count = 3;
        config.run.horizon = 50.0;
        config.demography.removal_interval = 20.0;
        config
    }

    #[test]
    fn test_time_never_decreases() {
        let mut pop = Population::new(small_config(), RandomSource::from_seed(71)).unwrap();
        let mut recorder = MemoryRecorder::default();
        let mut last = pop.time();
        while let StepOutcome::Continue = pop.step(&mut recorder).unwrap() {
            assert!(pop.time() >= last);
            last = pop.time();
        }
    }

    #[test]
    fn test_run_reaches_horizon() {
        let mut pop = Population::new(small_config(), RandomSource::from_seed(72)).unwrap();
        let mut recorder = MemoryRecorder::default();
        let summary = pop.simulate(&mut recorder).unwrap();
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert!(summary.final_time >= 50.0);
        assert!(summary.events > 0);
        assert!(recorder.final_state.is_some());
        assert!(!recorder.snapshots.is_empty());
    }

    #[test]
    fn test_counters_are_consistent() {
        let mut config = small_config();
        config.demography.kill_mode = KillMode::Disabled;
        config.demography.repro_mode = ReproMode::Disabled;
        let mut pop = Population::new(config, RandomSource::from_seed(73)).unwrap();
        pop.simulate(&mut MemoryRecorder::default()).unwrap();
        let c = pop.counters();
        assert_eq!(c.actions, c.departures + c.returns);
        assert_eq!(c.departures, c.steals + c.successful_forages);
        assert!(c.successful_steals <= c.steals);
        assert!(c.successful_returns <= c.food_returns);
        assert_eq!(c.raids_received, c.steals);
    }

    #[test]
    fn test_finished_run_stays_finished() {
        let mut pop = Population::new(small_config(), RandomSource::from_seed(74)).unwrap();
        let mut recorder = MemoryRecorder::default();
        pop.simulate(&mut recorder).unwrap();
        assert_eq!(
            pop.step(&mut recorder).unwrap(),
            StepOutcome::Finished(RunOutcome::Completed)
        );
    }

    #[test]
    fn test_dead_nest_events_are_skipped() {
        let mut config = small_config();
        config.demography.kill_mode = KillMode::Disabled;
        config.demography.repro_mode = ReproMode::Disabled;
        config.demography.frac_dead_nests_recorded = 1.0;
        let mut pop = Population::new(config, RandomSource::from_seed(75)).unwrap();
        let mut recorder = MemoryRecorder::default();

        let victim = pop.nests()[0].id;
        let queued = pop.nests()[0].workers.len() as u64;
        assert!(pop.remove_nest(victim, DeathCause::MassKill));

        // Every founding worker acts once before time 1.
        while pop.time() < 1.0 {
            assert_eq!(pop.step(&mut recorder).unwrap(), StepOutcome::Continue);
        }

        let summary = pop.summary();
        assert_eq!(summary.stale_events, queued);
        assert_eq!(summary.alive_nests, 3);
        let live_actions: u64 = pop.nests().iter().map(|n| n.counters.actions).sum();
        assert_eq!(pop.counters().actions, live_actions);
        assert_eq!(summary.events, live_actions);

        let records = pop.drain_dead_nests();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nest_id, victim);
        assert_eq!(records[0].counters, ActionCounters::default());
    }
}
