use super::colony::{DeathCause, NestId};
use serde::{Deserialize, Serialize};

/// Structural changes of the population, reported as they happen.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    NestBorn {
        time: f64,
        nest_id: NestId,
        mother_id: NestId,
    },
    NestDied {
        time: f64,
        nest_id: NestId,
        cause: DeathCause,
        stock: f64,
        age: f64,
        archived: bool,
    },
    MassKill {
        time: f64,
        killed: usize,
        survivors: usize,
    },
    MassReproduction {
        time: f64,
        born: usize,
        food_reset: bool,
    },
    Collapse {
        time: f64,
    },
}

impl LifecycleEvent {
    /// Simulated time at which the event happened.
    pub fn time(&self) -> f64 {
        match self {
            LifecycleEvent::NestBorn { time, .. }
            | LifecycleEvent::NestDied { time, .. }
            | LifecycleEvent::MassKill { time, .. }
            | LifecycleEvent::MassReproduction { time, .. }
            | LifecycleEvent::Collapse { time } => *time,
        }
    }
}
