//! # Crozier
//!
//! Individual-based simulation of social-insect colonies that recognise
//! nestmates by cue profiles. The engine lives in `crozier_core`, records
//! in `crozier_data` and file output in `crozier_io`; this crate ties them
//! together behind [`runner`] and the `crozier` binary.

pub mod model;
pub mod runner;
