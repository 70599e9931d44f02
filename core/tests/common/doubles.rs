// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for the local queue and the remote backend.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use todosync_core::{
    Fault, Mutation, MutationBatch, MutationKind, Payload, PendingQueue, RemoteBackend, StoreError,
};

/// A queue holding batches in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    batches: Mutex<VecDeque<MutationBatch>>,
    completed: Mutex<Vec<i64>>,
    fail_reads: AtomicBool,
    fail_completions: AtomicBool,
}

impl MemoryQueue {
    pub fn new(batches: impl IntoIterator<Item = MutationBatch>) -> Self {
        Self {
            batches: Mutex::new(batches.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Transaction ids of the batches marked complete, in order.
    pub fn completed(&self) -> Vec<i64> {
        self.completed.lock().unwrap().clone()
    }

    pub fn pending(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    /// Makes every read of the next pending batch fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every completion marker write fail, leaving the batch queued.
    pub fn fail_completions(&self, fail: bool) {
        self.fail_completions.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PendingQueue for MemoryQueue {
    async fn next_pending_batch(&self) -> Result<Option<MutationBatch>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err("database is locked".into());
        }
        Ok(self.batches.lock().unwrap().front().cloned())
    }

    async fn mark_batch_complete(&self, batch: &MutationBatch) -> Result<(), StoreError> {
        if self.fail_completions.load(Ordering::SeqCst) {
            return Err("disk I/O error".into());
        }
        let mut batches = self.batches.lock().unwrap();
        if batches.front().map(|a| a.tx_id) != Some(batch.tx_id) {
            return Err(format!("batch {} is not the pending one", batch.tx_id).into());
        }
        batches.pop_front();
        self.completed.lock().unwrap().push(batch.tx_id);
        Ok(())
    }
}

/// A backend that records every dispatched mutation and answers from a
/// script, one entry per call. Calls past the end of the script succeed.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    script: Mutex<VecDeque<Result<(), Fault>>>,
    dispatched: Mutex<Vec<Mutation>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeeds `ok` times, then fails once with `fault`.
    pub fn failing_after(ok: usize, fault: Fault) -> Self {
        let mut script: VecDeque<_> = std::iter::repeat_n(Ok(()), ok).collect();
        script.push_back(Err(fault));
        Self {
            script: Mutex::new(script),
            ..Default::default()
        }
    }

    pub fn dispatched(&self) -> Vec<Mutation> {
        self.dispatched.lock().unwrap().clone()
    }

    /// Row ids of the dispatched mutations, in dispatch order.
    pub fn dispatched_rows(&self) -> Vec<String> {
        self.dispatched().into_iter().map(|m| m.row_id).collect()
    }
}

#[async_trait]
impl RemoteBackend for RecordingBackend {
    async fn apply(&self, mutation: &Mutation) -> Result<(), Fault> {
        self.dispatched.lock().unwrap().push(mutation.clone());
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// A backend that keeps rows in memory and applies mutations with the
/// per-row semantics of the real one. Faults can be injected per call.
#[derive(Debug, Default)]
pub struct TableBackend {
    rows: Mutex<BTreeMap<(String, String), Payload>>,
    faults: Mutex<VecDeque<Option<Fault>>>,
}

impl TableBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues per-call answers: `None` applies the mutation, `Some` fails
    /// without touching the rows.
    pub fn inject(&self, answers: impl IntoIterator<Item = Option<Fault>>) {
        self.faults.lock().unwrap().extend(answers);
    }

    pub fn rows(&self) -> BTreeMap<(String, String), Payload> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteBackend for TableBackend {
    async fn apply(&self, mutation: &Mutation) -> Result<(), Fault> {
        if let Some(Some(fault)) = self.faults.lock().unwrap().pop_front() {
            return Err(fault);
        }

        let key = (mutation.table.clone(), mutation.row_id.clone());
        let mut rows = self.rows.lock().unwrap();
        match mutation.kind {
            MutationKind::Put => {
                rows.insert(key, mutation.payload.clone().unwrap_or_default());
            }
            MutationKind::Patch => {
                if let (Some(row), Some(patch)) = (rows.get_mut(&key), &mutation.payload) {
                    row.extend(patch.clone());
                }
            }
            MutationKind::Delete => {
                rows.remove(&key);
            }
        }
        Ok(())
    }
}
