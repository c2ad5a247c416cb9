//! Aggregate statistics for a pipeline run.

use std::time::Duration;

use serde::Serialize;

use super::outcome::{PipeOutcome, PipeStatus};

/// Statistics collected during a pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Total rows moved by completed pipes.
    pub total_rows: u64,

    /// Total batches moved by completed pipes.
    pub total_batches: u64,

    pub pipes_completed: usize,
    pub pipes_failed: usize,
    pub pipes_skipped: usize,

    /// Time spent inside completed transfers.
    pub transfer_time: Duration,

    /// Total elapsed wall-clock time.
    pub total_time: Duration,

    /// Average rows per second over the whole run.
    pub rows_per_second: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &PipelineStats) {
        self.total_rows += other.total_rows;
        self.total_batches += other.total_batches;
        self.pipes_completed += other.pipes_completed;
        self.pipes_failed += other.pipes_failed;
        self.pipes_skipped += other.pipes_skipped;
        self.transfer_time += other.transfer_time;
        // total_time and throughput are recalculated
    }

    /// Count one pipe outcome.
    pub fn merge_outcome(&mut self, outcome: &PipeOutcome) {
        match outcome.status {
            PipeStatus::Completed => {
                self.pipes_completed += 1;
                if let Some(summary) = &outcome.summary {
                    self.total_rows += summary.rows;
                    self.total_batches += summary.batches;
                    self.transfer_time += summary.elapsed;
                }
            }
            PipeStatus::Failed => self.pipes_failed += 1,
            PipeStatus::Skipped => self.pipes_skipped += 1,
        }
    }

    /// Finalize stats by calculating derived metrics.
    pub fn finalize(&mut self, total_time: Duration) {
        self.total_time = total_time;
        let secs = total_time.as_secs_f64();
        if secs > 0.0 {
            self.rows_per_second = self.total_rows as f64 / secs;
        }
    }

    /// Format a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Transferred {} rows in {:.1}s ({:.0} rows/sec). Pipes: {} completed, {} failed, {} skipped.",
            self.total_rows,
            self.total_time.as_secs_f64(),
            self.rows_per_second,
            self.pipes_completed,
            self.pipes_failed,
            self.pipes_skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XferError;
    use crate::transfer::TransferSummary;
    use chrono::Utc;

    fn completed(index: usize, rows: u64) -> PipeOutcome {
        PipeOutcome::completed(
            index,
            format!("src{}", index),
            format!("DST{}", index),
            TransferSummary {
                rows,
                batches: rows.div_ceil(10),
                started_at: Utc::now(),
                elapsed: Duration::from_millis(500),
            },
        )
    }

    #[test]
    fn test_merge_outcomes() {
        let mut stats = PipelineStats::new();
        stats.merge_outcome(&completed(0, 100));
        stats.merge_outcome(&completed(1, 50));
        stats.merge_outcome(&PipeOutcome::failed(
            2,
            "x".into(),
            "X".into(),
            XferError::unsupported("stream import"),
        ));
        stats.merge_outcome(&PipeOutcome::skipped(3, "y".into(), "Y".into()));

        assert_eq!(stats.total_rows, 150);
        assert_eq!(stats.total_batches, 15);
        assert_eq!(stats.pipes_completed, 2);
        assert_eq!(stats.pipes_failed, 1);
        assert_eq!(stats.pipes_skipped, 1);
        assert_eq!(stats.transfer_time, Duration::from_secs(1));
    }

    #[test]
    fn test_finalize_and_summary() {
        let mut stats = PipelineStats::new();
        stats.merge_outcome(&completed(0, 1000));
        stats.finalize(Duration::from_secs(2));

        assert_eq!(stats.rows_per_second, 500.0);
        let summary = stats.summary();
        assert!(summary.contains("1000 rows"));
        assert!(summary.contains("1 completed, 0 failed, 0 skipped"));
    }

    #[test]
    fn test_merge_stats() {
        let mut a = PipelineStats::new();
        a.merge_outcome(&completed(0, 10));
        let mut b = PipelineStats::new();
        b.merge_outcome(&completed(1, 20));
        a.merge(&b);
        assert_eq!(a.total_rows, 30);
        assert_eq!(a.pipes_completed, 2);
    }
}
