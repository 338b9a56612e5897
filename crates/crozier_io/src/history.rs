use crate::error::Result;
use chrono::Utc;
use crozier_core::recorder::Recorder;
use crozier_data::LifecycleEvent;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One line of the `<run>_events.jsonl` history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// RFC 3339 wall-clock time at which the line was written.
    pub timestamp: String,
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

pub struct HistoryLogger {
    file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
}

impl HistoryLogger {
    pub fn new_at<P: AsRef<Path>>(dir: P, run_name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        let path = dir.join(format!("{run_name}_events.jsonl"));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            path: Some(path),
        })
    }

    /// A logger that drops everything.
    pub fn new_dummy() -> Self {
        Self {
            file: None,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn log_event(&mut self, event: &LifecycleEvent) -> Result<()> {
        if let Some(ref mut file) = self.file {
            let entry = HistoryEntry {
                timestamp: Utc::now().to_rfc3339(),
                event: event.clone(),
            };
            let json = serde_json::to_string(&entry)?;
            writeln!(file, "{}", json)?;
            file.flush()?;
        }
        Ok(())
    }
}

impl Recorder for HistoryLogger {
    fn on_event(&mut self, event: &LifecycleEvent) -> anyhow::Result<()> {
        Ok(self.log_event(event)?)
    }
}

/// Reads back a history file, skipping lines that do not parse.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryEntry>> {
    let file = match File::open(path.as_ref()) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for line in reader.lines().map_while(std::result::Result::ok) {
        match serde_json::from_str::<HistoryEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!(error = %e, "Skipping malformed history line"),
        }
    }
    Ok(entries)
}
