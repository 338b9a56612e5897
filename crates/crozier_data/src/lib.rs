//! # Crozier Data
//!
//! Plain, serializable records shared between the simulation core and the
//! output layer. Nothing in here owns behaviour beyond small bookkeeping
//! helpers; the simulation semantics live in `crozier_core`.

pub mod data;

pub use data::colony::{
    ActionCounters, DeadNestRecord, DeathCause, IndividualId, IndividualRecord, NestId,
    FOUNDER_MOTHER_ID,
};
pub use data::events::LifecycleEvent;
pub use data::report::{FinalState, MeanStd, PopulationSnapshot};
