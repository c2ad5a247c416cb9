//! Sequential execution of a pipeline's pipes.

use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::{FailurePolicy, RunnerConfig};
use crate::error::{Result, XferError};
use crate::monitor::ProgressMonitor;
use crate::transfer::{DataTransferSettings, TransferOptions};

use super::outcome::{PipeOutcome, PipeStatus};
use super::stats::PipelineStats;

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// One outcome per pipe, in pipe order.
    pub outcomes: Vec<PipeOutcome>,
    pub stats: PipelineStats,
    /// The monitor was cancelled before every pipe ran.
    pub cancelled: bool,
}

impl PipelineReport {
    /// Every pipe completed.
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status == PipeStatus::Completed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PipeOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == PipeStatus::Failed)
    }

    /// Compact, serializable view for JSON output.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct PipeRow<'a> {
            index: usize,
            source: &'a str,
            target: &'a str,
            status: PipeStatus,
            rows: u64,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
        }

        #[derive(Serialize)]
        struct Report<'a> {
            cancelled: bool,
            stats: &'a PipelineStats,
            pipes: Vec<PipeRow<'a>>,
        }

        let pipes = self
            .outcomes
            .iter()
            .map(|o| PipeRow {
                index: o.index,
                source: &o.source,
                target: &o.target,
                status: o.status,
                rows: o.rows(),
                error: o.error.as_ref().map(ToString::to_string),
            })
            .collect();

        serde_json::to_string_pretty(&Report {
            cancelled: self.cancelled,
            stats: &self.stats,
            pipes,
        })
    }
}

/// Runs the pipes of a [`DataTransferSettings`] one after another.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunner {
    config: RunnerConfig,
}

impl PipelineRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    /// Run every pipe in order.
    ///
    /// # Errors
    ///
    /// `Validation` when the pipeline is empty or not complete; nothing runs
    /// in that case. Pipe failures do not fail the run; they are recorded in
    /// the report.
    pub async fn run(
        &self,
        settings: &mut DataTransferSettings,
        monitor: &ProgressMonitor,
    ) -> Result<PipelineReport> {
        if settings.is_empty() {
            return Err(XferError::Validation("pipeline has no pipes".into()));
        }
        let unready = settings.unready_pipes();
        if !unready.is_empty() {
            let listed: Vec<String> = unready.iter().map(|i| format!("#{}", i + 1)).collect();
            return Err(XferError::Validation(format!(
                "pipeline is not complete, unready pipes: {}",
                listed.join(", ")
            )));
        }

        let options = TransferOptions {
            batch_size: self.config.batch_size,
            channel_buffer: self.config.channel_buffer,
            properties: settings.properties().clone(),
        };

        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(settings.len());
        let mut stop = false;
        let mut cancelled = false;

        info!(
            "Starting pipeline with {} pipes ({:?})",
            settings.len(),
            self.config.failure_policy
        );

        for (index, pipe) in settings.pipes_mut().iter_mut().enumerate() {
            let source = pipe.producer_label();
            let target = pipe.consumer_label();

            if !stop && monitor.is_cancelled() {
                warn!("Pipeline cancelled before pipe #{}", index + 1);
                cancelled = true;
                stop = true;
            }
            if stop {
                outcomes.push(PipeOutcome::skipped(index, source, target));
                continue;
            }

            monitor.subtask(&format!("Pipe #{}: {} -> {}", index + 1, source, target));
            match pipe.run(monitor, &options).await {
                Ok(summary) => {
                    info!(
                        "Pipe #{} {} -> {}: {} rows",
                        index + 1,
                        source,
                        target,
                        summary.rows
                    );
                    outcomes.push(PipeOutcome::completed(index, source, target, summary));
                }
                Err(e) => {
                    let outcome = PipeOutcome::failed(index, source, target, e);
                    if let Some(err) = &outcome.error {
                        error!("{}", err);
                        if err.is_cancelled() {
                            cancelled = true;
                            stop = true;
                        }
                    }
                    if self.config.failure_policy == FailurePolicy::AllOrNothing {
                        stop = true;
                    }
                    outcomes.push(outcome);
                }
            }
        }

        let mut stats = PipelineStats::new();
        for outcome in &outcomes {
            stats.merge_outcome(outcome);
        }
        stats.finalize(start.elapsed());
        info!("{}", stats.summary());

        Ok(PipelineReport {
            outcomes,
            stats,
            cancelled,
        })
    }
}
