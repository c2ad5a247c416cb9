//! Pipeline execution.
//!
//! - [`PipelineRunner`]: runs a complete [`DataTransferSettings`] pipe by pipe
//! - [`PipeOutcome`]: what happened to one pipe
//! - [`PipelineStats`]: aggregate rows, timing and throughput
//!
//! The runner never starts an incomplete pipeline. Once running, a failing
//! pipe is recorded and, depending on the [`FailurePolicy`], either the
//! remaining pipes still run or they are skipped.
//!
//! [`DataTransferSettings`]: crate::transfer::DataTransferSettings
//! [`FailurePolicy`]: crate::config::FailurePolicy

mod outcome;
mod runner;
mod stats;

pub use outcome::{PipeOutcome, PipeStatus};
pub use runner::{PipelineReport, PipelineRunner};
pub use stats::PipelineStats;
