//! Core data structures for the colony simulation.

pub mod colony;
pub mod events;
pub mod report;
