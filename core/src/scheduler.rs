// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Drives the reconciler: drains the queue on demand, or keeps draining in
//! the background with exponential backoff on transient faults.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::reconciler::{
    PendingQueue, ReconcileOutcome, RemoteBackend, UploadError, UploadReconciler,
};

/// Upper bound of the backoff exponent.
const MAX_EXPONENT: u32 = 8;

/// Counts of the batches handled by a drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    /// Batches applied in full.
    pub uploaded: usize,
    /// Batches dropped on a permanent fault.
    pub discarded: usize,
}

impl DrainSummary {
    fn record(&mut self, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Idle => {}
            ReconcileOutcome::Completed { .. } => self.uploaded += 1,
            ReconcileOutcome::Discarded { .. } => self.discarded += 1,
        }
    }

    fn merge(&mut self, other: DrainSummary) {
        self.uploaded += other.uploaded;
        self.discarded += other.discarded;
    }
}

/// A drain stopped by an upload error, with the batches handled before it.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct DrainError {
    /// Batches uploaded or discarded before the error.
    pub summary: DrainSummary,
    /// The error that stopped the drain.
    #[source]
    pub source: UploadError,
}

/// Delay before the next attempt after `failures` consecutive failed rounds.
pub fn backoff_delay(base: Duration, failures: u32) -> Duration {
    let exponent = failures.saturating_sub(1).min(MAX_EXPONENT);
    base.saturating_mul(2_u32.pow(exponent))
}

#[derive(Debug)]
pub struct UploadScheduler<Q, B> {
    reconciler: UploadReconciler<Q, B>,
    interval: Duration,
    retry_delay: Duration,
    trigger: Arc<Notify>,
}

impl<Q: PendingQueue, B: RemoteBackend> UploadScheduler<Q, B> {
    pub fn new(reconciler: UploadReconciler<Q, B>, interval: Duration, retry_delay: Duration) -> Self {
        Self {
            reconciler,
            interval,
            retry_delay,
            trigger: Arc::new(Notify::new()),
        }
    }

    pub fn reconciler(&self) -> &UploadReconciler<Q, B> {
        &self.reconciler
    }

    /// A handle that wakes a running [`UploadScheduler::run`] early, e.g.
    /// after a local write.
    pub fn trigger(&self) -> Arc<Notify> {
        self.trigger.clone()
    }

    /// Uploads pending batches until the queue is empty.
    ///
    /// # Errors
    ///
    /// Stops at the first transient fault or queue error; batches uploaded
    /// before it stay uploaded and are counted in [`DrainError::summary`].
    pub async fn drain(&mut self) -> Result<DrainSummary, DrainError> {
        let mut summary = DrainSummary::default();
        match self.drain_into(&mut summary).await {
            Ok(()) => Ok(summary),
            Err(source) => Err(DrainError { summary, source }),
        }
    }

    async fn drain_into(&mut self, summary: &mut DrainSummary) -> Result<(), UploadError> {
        loop {
            let outcome = self.reconciler.reconcile_next_batch().await?;
            if outcome == ReconcileOutcome::Idle {
                return Ok(());
            }
            summary.record(&outcome);
        }
    }

    /// Keeps draining until `shutdown` resolves.
    ///
    /// Rounds run every `interval`, or as soon as the trigger fires. After a
    /// failed round the next one waits `retry_delay`, doubled per consecutive
    /// failure.
    pub async fn run<F>(&mut self, shutdown: F) -> DrainSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut total = DrainSummary::default();
        let mut failures = 0_u32;
        loop {
            let mut summary = DrainSummary::default();
            let delay = match self.drain_into(&mut summary).await {
                Ok(()) => {
                    failures = 0;
                    self.interval
                }
                Err(err) => {
                    failures = failures.saturating_add(1);
                    let delay = backoff_delay(self.retry_delay, failures);
                    match &err {
                        UploadError::Transient { .. } => {
                            tracing::warn!(%err, failures, ?delay, "upload round failed, retrying")
                        }
                        UploadError::Store(_) => {
                            tracing::error!(%err, failures, ?delay, "upload round failed, retrying")
                        }
                    }
                    delay
                }
            };
            total.merge(summary);

            tokio::select! {
                () = &mut shutdown => break,
                () = tokio::time::sleep(delay) => {}
                () = self.trigger.notified() => tracing::debug!("upload triggered"),
            }
        }

        tracing::debug!(
            uploaded = total.uploaded,
            discarded = total.discarded,
            "upload loop stopped"
        );
        total
    }
}
