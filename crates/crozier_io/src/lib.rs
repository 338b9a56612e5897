//! # Crozier IO
//!
//! Output layer for the colony simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - CSV tables for snapshots, dead nests and the final state
//! - A JSONL history of lifecycle events
//! - Parameter exports tying every output file to its configuration

/// CSV tables written as the run progresses
pub mod csv;
/// Error types and result aliases for I/O operations
pub mod error;
/// Lifecycle event logging
pub mod history;
/// Parameter export and read-back
pub mod persistence;

pub use crate::csv::CsvRecorder;
pub use error::{IoError, Result};
pub use history::{read_events, HistoryEntry, HistoryLogger};
pub use persistence::{export_parameters, read_parameters, ParameterExport};

use crozier_core::config::AppConfig;
use crozier_core::recorder::Recorder;
use crozier_data::{DeadNestRecord, FinalState, LifecycleEvent, PopulationSnapshot};
use std::path::Path;

/// Everything a run writes to disk: the CSV tables plus the event history.
pub struct RunRecorder {
    pub tables: CsvRecorder,
    pub history: HistoryLogger,
}

impl RunRecorder {
    pub fn create<P: AsRef<Path>>(dir: P, run_name: &str, config: &AppConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let tables = CsvRecorder::create(dir, run_name, config)
            .map_err(|e| e.with_context(format!("opening tables for run {run_name}")))?;
        let history = HistoryLogger::new_at(dir, run_name)?;
        tracing::debug!(dir = %dir.display(), run = run_name, "Output files opened");
        Ok(Self { tables, history })
    }
}

impl Recorder for RunRecorder {
    fn on_snapshot(&mut self, snapshot: &PopulationSnapshot) -> anyhow::Result<()> {
        self.tables.on_snapshot(snapshot)
    }

    fn on_dead_nests(&mut self, now: f64, records: &[DeadNestRecord]) -> anyhow::Result<()> {
        self.tables.on_dead_nests(now, records)
    }

    fn on_event(&mut self, event: &LifecycleEvent) -> anyhow::Result<()> {
        self.history.on_event(event)
    }

    fn on_finish(&mut self, state: &FinalState) -> anyhow::Result<()> {
        self.tables.on_finish(state)
    }
}
