pub use crozier_core::{Population, RandomSource, Recorder, RunOutcome, RunSummary};
pub mod config {
    pub use crozier_core::config::*;
}
pub mod distance {
    pub use crozier_core::distance::*;
}
pub mod individual {
    pub use crozier_core::individual::*;
}
pub mod nest {
    pub use crozier_core::nest::*;
}
pub mod population {
    pub use crozier_core::population::*;
}
pub mod recorder {
    pub use crozier_core::recorder::*;
}
pub mod rng {
    pub use crozier_core::rng::*;
}
pub mod scheduler {
    pub use crozier_core::scheduler::*;
}
pub mod stats {
    pub use crozier_core::stats::*;
}
pub mod metrics {
    pub use crozier_core::metrics::*;
}
pub mod data {
    pub use crozier_data::*;
}
pub mod output {
    pub use crozier_io::*;
}
