//! Cancellable progress handle passed to every long-running operation.
//!
//! A [`ProgressMonitor`] wraps a [`CancellationToken`] and a shared work
//! counter. Operations poll it at session boundaries and between batches;
//! cancellation is cooperative only.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Result, XferError};

/// Cooperative cancellation and progress reporting handle.
///
/// Cloning is cheap; clones share the token and the work counter.
#[derive(Debug, Clone, Default)]
pub struct ProgressMonitor {
    cancel: CancellationToken,
    work_done: Arc<AtomicU64>,
}

impl ProgressMonitor {
    /// Create a monitor with a fresh cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a monitor driven by an existing token (e.g. a signal handler's).
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            work_done: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Derive a monitor that is cancelled with this one but can also be
    /// cancelled on its own. Work is still counted on the parent.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            work_done: self.work_done.clone(),
        }
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with [`XferError::Cancelled`] if cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(XferError::Cancelled);
        }
        Ok(())
    }

    /// Log the start of a named step.
    pub fn subtask(&self, name: &str) {
        debug!("{}", name);
    }

    /// Record units of completed work (rows, for transfers).
    pub fn worked(&self, units: u64) {
        self.work_done.fetch_add(units, Ordering::Relaxed);
    }

    /// Total units of work recorded so far.
    pub fn work_done(&self) -> u64 {
        self.work_done.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_fails_after_cancel() {
        let monitor = ProgressMonitor::new();
        assert!(monitor.check().is_ok());
        monitor.cancel();
        assert!(matches!(monitor.check(), Err(XferError::Cancelled)));
    }

    #[test]
    fn test_child_follows_parent_but_not_reverse() {
        let parent = ProgressMonitor::new();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_work_is_shared_with_children() {
        let parent = ProgressMonitor::new();
        let child = parent.child();
        child.worked(40);
        parent.worked(2);
        assert_eq!(parent.work_done(), 42);
    }
}
