//! Run metrics and structured logging.
//!
//! Counts what the event loop did and reports progress through `tracing`.

use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Bookkeeping for a single run.
#[derive(Debug, Clone)]
pub struct Metrics {
    events: u64,
    stale_events: u64,
    births: u64,
    starvation_deaths: u64,
    mass_kill_deaths: u64,
    progress_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100_000)
    }
}

impl Metrics {
    /// Creates a collector that logs every `progress_interval` events.
    #[must_use]
    pub fn new(progress_interval: u64) -> Self {
        Self {
            events: 0,
            stale_events: 0,
            births: 0,
            starvation_deaths: 0,
            mass_kill_deaths: 0,
            progress_interval: progress_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a processed worker action.
    pub fn record_event(&mut self, time: f64, alive_nests: usize, global_stock: f64) {
        self.events += 1;
        if self.events % self.progress_interval == 0 {
            tracing::info!(
                events = self.events,
                time = time,
                alive_nests = alive_nests,
                global_stock = global_stock,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Simulation progress"
            );
        }
    }

    /// Records an event whose nest had already died.
    pub fn record_stale(&mut self) {
        self.stale_events += 1;
    }

    pub fn record_birth(&mut self) {
        self.births += 1;
    }

    pub fn record_starvation(&mut self) {
        self.starvation_deaths += 1;
    }

    pub fn record_mass_kill(&mut self, killed: usize) {
        self.mass_kill_deaths += killed as u64;
    }

    #[must_use]
    pub fn events(&self) -> u64 {
        self.events
    }

    #[must_use]
    pub fn stale_events(&self) -> u64 {
        self.stale_events
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births
    }

    #[must_use]
    pub fn starvation_deaths(&self) -> u64 {
        self.starvation_deaths
    }

    #[must_use]
    pub fn mass_kill_deaths(&self) -> u64 {
        self.mass_kill_deaths
    }

    /// Gets elapsed wall-clock time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` wins over the
/// INFO default.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Same as [`init_logging`] with a caller-chosen default directive.
pub fn init_logging_with_default(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
