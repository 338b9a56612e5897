//! The seam through which a running population hands its state out.
//!
//! The core never formats or writes files. It calls a [`Recorder`] at its
//! own cadence; `crozier_io` provides the CSV and JSONL implementations.

use crozier_data::{DeadNestRecord, FinalState, LifecycleEvent, PopulationSnapshot};

pub trait Recorder {
    /// One evolution row, at most once per output interval.
    fn on_snapshot(&mut self, _snapshot: &PopulationSnapshot) -> anyhow::Result<()> {
        Ok(())
    }

    /// Archived dead nests, flushed on the snapshot cadence.
    fn on_dead_nests(&mut self, _now: f64, _records: &[DeadNestRecord]) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_event(&mut self, _event: &LifecycleEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_finish(&mut self, _state: &FinalState) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl Recorder for NullRecorder {}

/// Keeps everything in memory. Used by tests and benchmarks.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub snapshots: Vec<PopulationSnapshot>,
    pub dead_nests: Vec<DeadNestRecord>,
    pub events: Vec<LifecycleEvent>,
    pub final_state: Option<FinalState>,
}

impl Recorder for MemoryRecorder {
    fn on_snapshot(&mut self, snapshot: &PopulationSnapshot) -> anyhow::Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn on_dead_nests(&mut self, _now: f64, records: &[DeadNestRecord]) -> anyhow::Result<()> {
        self.dead_nests.extend_from_slice(records);
        Ok(())
    }

    fn on_event(&mut self, event: &LifecycleEvent) -> anyhow::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn on_finish(&mut self, state: &FinalState) -> anyhow::Result<()> {
        self.final_state = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_recorder_collects() {
        let mut recorder = MemoryRecorder::default();
        recorder
            .on_event(&LifecycleEvent::Collapse { time: 3.0 })
            .unwrap();
        recorder
            .on_snapshot(&PopulationSnapshot::default())
            .unwrap();
        assert_eq!(recorder.events.len(), 1);
        assert_eq!(recorder.snapshots.len(), 1);
        assert!(recorder.final_state.is_none());
    }

    #[test]
    fn test_null_recorder_accepts_everything() {
        let mut recorder = NullRecorder;
        assert!(recorder.on_dead_nests(1.0, &[]).is_ok());
        assert!(recorder.on_finish(&FinalState::default()).is_ok());
    }
}
