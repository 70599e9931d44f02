// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Replays queued local mutations against the remote backend.

use std::error::Error;

use async_trait::async_trait;

use crate::events::{Listeners, SyncEvent};
use crate::fault::{Fault, FaultClass, FaultClassifier};
use crate::mutation::{Mutation, MutationBatch};

/// Error type of the local queue.
pub type StoreError = Box<dyn Error + Send + Sync>;

/// Source of pending mutation batches.
///
/// A batch handed out stays pending until it is marked complete, and the same
/// batch is handed out again on the next call until then.
#[async_trait]
pub trait PendingQueue: Send + Sync {
    /// The oldest pending batch, if any.
    async fn next_pending_batch(&self) -> Result<Option<MutationBatch>, StoreError>;

    /// Removes the batch from the queue.
    async fn mark_batch_complete(&self, batch: &MutationBatch) -> Result<(), StoreError>;
}

/// Destination that applies one mutation as one atomic request.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Applies the mutation, or reports why the backend refused it.
    async fn apply(&self, mutation: &Mutation) -> Result<(), Fault>;
}

/// The result of one reconciliation attempt that did not need a retry.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Nothing was pending.
    Idle,
    /// Every mutation was applied and the batch was removed from the queue.
    Completed {
        /// The local transaction of the batch.
        tx_id: i64,
        /// Number of mutations applied.
        applied: usize,
    },
    /// A mutation hit a permanent fault. The batch was removed from the queue,
    /// including the mutations after the faulted one.
    Discarded {
        /// The local transaction of the batch.
        tx_id: i64,
        /// Number of mutations applied before the fault.
        applied: usize,
        /// Number of mutations never sent.
        skipped: usize,
        /// The permanent fault.
        fault: Fault,
    },
}

/// Upload errors. All of them leave the batch pending.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The backend reported a fault that may go away on retry.
    #[error("transient fault uploading transaction {tx_id}: {fault}")]
    Transient {
        /// The local transaction of the batch.
        tx_id: i64,
        /// The fault.
        fault: Fault,
    },

    /// Reading the queue or writing the completion marker failed.
    #[error("local queue error: {0}")]
    Store(#[from] StoreError),
}

impl UploadError {
    /// The backend fault behind the error, if any.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            UploadError::Transient { fault, .. } => Some(fault),
            UploadError::Store(_) => None,
        }
    }
}

/// Drains one pending batch per call into the backend.
///
/// Mutations of a batch are sent one at a time, in order. A permanent fault
/// discards the whole batch and is not reported as an error. A transient fault
/// aborts the attempt and leaves the batch queued; the next call starts over
/// from its first mutation, which is safe since upsert, update-by-id and
/// delete-by-id are idempotent per row. Mutations applied before a later
/// permanent fault are not rolled back.
#[derive(Debug)]
pub struct UploadReconciler<Q, B> {
    queue: Q,
    backend: B,
    classifier: FaultClassifier,
    listeners: Listeners,
}

impl<Q: PendingQueue, B: RemoteBackend> UploadReconciler<Q, B> {
    /// Creates a reconciler with the default fault classification.
    pub fn new(queue: Q, backend: B) -> Self {
        Self {
            queue,
            backend,
            classifier: FaultClassifier::default(),
            listeners: Listeners::new(),
        }
    }

    /// Replaces the fault classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: FaultClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Emits upload events to the given registry.
    #[must_use]
    pub fn with_listeners(mut self, listeners: Listeners) -> Self {
        self.listeners = listeners;
        self
    }

    /// The queue this reconciler drains.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// The backend this reconciler writes to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Uploads the next pending batch, if any.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Transient`] when the backend reports a retryable
    /// fault, and [`UploadError::Store`] when the local queue fails. In both
    /// cases the batch stays pending.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_next_batch(&mut self) -> Result<ReconcileOutcome, UploadError> {
        let Some(batch) = self.queue.next_pending_batch().await? else {
            tracing::trace!("no pending batch");
            return Ok(ReconcileOutcome::Idle);
        };

        if batch.is_empty() {
            tracing::debug!(tx_id = batch.tx_id, "pending batch holds no mutations");
            return Ok(ReconcileOutcome::Idle);
        }

        let tx_id = batch.tx_id;
        tracing::debug!(tx_id, count = batch.len(), "uploading batch");

        for (i, mutation) in batch.mutations.iter().enumerate() {
            let Err(fault) = self.backend.apply(mutation).await else {
                continue;
            };

            match self.classifier.classify(&fault) {
                FaultClass::Permanent => {
                    tracing::error!(
                        tx_id,
                        table = %mutation.table,
                        row_id = %mutation.row_id,
                        kind = %mutation.kind,
                        code = %fault.code,
                        message = %fault.message,
                        "permanent fault, discarding batch"
                    );
                    self.queue.mark_batch_complete(&batch).await?;

                    self.listeners.emit(&SyncEvent::BatchDiscarded {
                        tx_id,
                        fault: fault.clone(),
                    });
                    return Ok(ReconcileOutcome::Discarded {
                        tx_id,
                        applied: i,
                        skipped: batch.len() - i - 1,
                        fault,
                    });
                }
                FaultClass::Transient => {
                    tracing::warn!(
                        tx_id,
                        table = %mutation.table,
                        row_id = %mutation.row_id,
                        code = %fault.code,
                        message = %fault.message,
                        "transient fault, batch stays pending"
                    );
                    self.listeners.emit(&SyncEvent::UploadFailed {
                        tx_id,
                        fault: fault.clone(),
                    });
                    return Err(UploadError::Transient { tx_id, fault });
                }
            }
        }

        self.queue.mark_batch_complete(&batch).await?;
        tracing::info!(tx_id, applied = batch.len(), "batch uploaded");

        self.listeners.emit(&SyncEvent::BatchUploaded {
            tx_id,
            applied: batch.len(),
        });
        Ok(ReconcileOutcome::Completed {
            tx_id,
            applied: batch.len(),
        })
    }
}
