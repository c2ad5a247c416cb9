//! Per-pipe results of a pipeline run.

use std::fmt;

use serde::Serialize;

use crate::error::{PartialWrite, XferError};
use crate::transfer::TransferSummary;

/// What happened to one pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeStatus {
    Completed,
    Failed,
    /// Not run: an earlier pipe failed under all-or-nothing, or the run was
    /// cancelled first.
    Skipped,
}

impl fmt::Display for PipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeStatus::Completed => f.write_str("completed"),
            PipeStatus::Failed => f.write_str("failed"),
            PipeStatus::Skipped => f.write_str("skipped"),
        }
    }
}

/// Result of one pipe.
#[derive(Debug)]
pub struct PipeOutcome {
    /// Position of the pipe in the settings.
    pub index: usize,

    /// Producer label at run time.
    pub source: String,

    /// Consumer label at run time.
    pub target: String,

    pub status: PipeStatus,

    /// Rows and timing, for completed pipes.
    pub summary: Option<TransferSummary>,

    /// The failure, attributed to this pipe.
    pub error: Option<XferError>,
}

impl PipeOutcome {
    pub fn completed(index: usize, source: String, target: String, summary: TransferSummary) -> Self {
        Self {
            index,
            source,
            target,
            status: PipeStatus::Completed,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failed(index: usize, source: String, target: String, error: XferError) -> Self {
        Self {
            index,
            source,
            target,
            status: PipeStatus::Failed,
            summary: None,
            error: Some(error.with_pipe(index)),
        }
    }

    pub fn skipped(index: usize, source: String, target: String) -> Self {
        Self {
            index,
            source,
            target,
            status: PipeStatus::Skipped,
            summary: None,
            error: None,
        }
    }

    /// Rows moved by this pipe; zero unless completed.
    pub fn rows(&self) -> u64 {
        self.summary.as_ref().map_or(0, |s| s.rows)
    }

    /// How the consumer was left, for failed transfers.
    pub fn partial_write(&self) -> Option<PartialWrite> {
        self.error.as_ref().and_then(XferError::partial_write)
    }
}
