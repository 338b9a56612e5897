//! # Crozier Core
//!
//! The simulation engine for the colony recognition model: social-insect
//! nests that recognise nestmates by cuticular cue profiles, raid each
//! other for food and evolve their tolerance of foreign cues.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Cue-profile distances and tolerance curves for nestmate recognition
//! - Nest and worker state with mutation on reproduction
//! - A time-ordered event queue of worker actions
//! - Starvation, periodic mass kills and reproduction
//! - Population statistics and the recorder seam for output
//!
//! ## Example
//!
//! ```
//! use crozier_core::config::AppConfig;
//! use crozier_core::population::Population;
//! use crozier_core::recorder::MemoryRecorder;
//! use crozier_core::rng::RandomSource;
//!
//! let mut config = AppConfig::default();
//! config.colony.colony_count = 3;
//! config.run.horizon = 5.0;
//!
//! let mut population = Population::new(config, RandomSource::from_seed(42)).unwrap();
//! let mut recorder = MemoryRecorder::default();
//! let summary = population.simulate(&mut recorder).unwrap();
//! assert!(summary.final_time >= 5.0);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Cue-profile dissimilarity measures
pub mod distance;
/// Error types for core operations
pub mod error;
/// Workers and their trip state
pub mod individual;
/// Run metrics and structured logging
pub mod metrics;
/// Colonies, encounters and tolerance
pub mod nest;
/// The population and its event loop
pub mod population;
/// Output seam between the core and recorders
pub mod recorder;
/// Seeded random source
pub mod rng;
/// Time-ordered event queue
pub mod scheduler;
/// Diversity and dissimilarity statistics
pub mod stats;

pub use config::AppConfig;
pub use error::{Result, SimError};
pub use metrics::{init_logging, Metrics};
pub use population::{Population, RunOutcome, RunSummary};
pub use recorder::Recorder;
pub use rng::RandomSource;
