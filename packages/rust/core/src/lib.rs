//! Pipeline orchestration: the daily run, initial seeding, standalone
//! rebuild, and the git publish step.

mod lock;
mod pipeline;
mod publish;

pub use lock::RunLock;
pub use pipeline::{
    DailyConfig, DailyRunResult, PipelineConfig, ProgressReporter, SetupConfig, SetupResult,
    SilentProgress, run_build, run_daily, run_setup,
};
pub use publish::publish;
