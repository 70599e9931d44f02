// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Subscriber registry for sync lifecycle events.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::fault::Fault;

/// The kinds of events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncEventKind {
    /// The local database is open and ready.
    Initialized,
    /// A batch was applied in full and removed from the queue.
    BatchUploaded,
    /// A batch hit a permanent fault and was dropped from the queue.
    BatchDiscarded,
    /// An upload attempt stopped on a transient fault; the batch stays queued.
    UploadFailed,
}

/// An event emitted during the sync lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The local database is open and ready.
    Initialized,
    /// A batch was applied in full.
    BatchUploaded {
        /// The local transaction of the batch.
        tx_id: i64,
        /// Number of mutations applied.
        applied: usize,
    },
    /// A batch was discarded on a permanent fault.
    BatchDiscarded {
        /// The local transaction of the batch.
        tx_id: i64,
        /// The fault that caused the discard.
        fault: Fault,
    },
    /// An upload attempt failed and will be retried.
    UploadFailed {
        /// The local transaction of the batch.
        tx_id: i64,
        /// The transient fault.
        fault: Fault,
    },
}

impl SyncEvent {
    /// The kind used to route this event to listeners.
    pub fn kind(&self) -> SyncEventKind {
        match self {
            SyncEvent::Initialized => SyncEventKind::Initialized,
            SyncEvent::BatchUploaded { .. } => SyncEventKind::BatchUploaded,
            SyncEvent::BatchDiscarded { .. } => SyncEventKind::BatchDiscarded,
            SyncEvent::UploadFailed { .. } => SyncEventKind::UploadFailed,
        }
    }
}

/// Identifies one registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle {
    kind: SyncEventKind,
    id: u64,
}

type Handler = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<SyncEventKind, Vec<(u64, Handler)>>,
}

/// Shared registry mapping event kinds to handlers.
///
/// Clones share the same registry. Handlers run synchronously on the emitting
/// task, in registration order.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Mutex<Registry>>,
}

impl Listeners {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one kind of event.
    pub fn subscribe<F>(&self, kind: SyncEventKind, handler: F) -> ListenerHandle
    where
        F: Fn(&SyncEvent) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .handlers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        ListenerHandle { kind, id }
    }

    /// Removes a registration. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        let mut registry = self.lock();
        let Some(handlers) = registry.handlers.get_mut(&handle.kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != handle.id);
        before != handlers.len()
    }

    /// Number of handlers registered for a kind.
    pub fn count(&self, kind: SyncEventKind) -> usize {
        self.lock().handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Invokes every handler registered for the event's kind.
    pub fn emit(&self, event: &SyncEvent) {
        // Handlers may subscribe or unsubscribe, so call them without the lock.
        let handlers: Vec<Handler> = self
            .lock()
            .handlers
            .get(&event.kind())
            .map(|hs| hs.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        tracing::trace!(kind = ?event.kind(), count = handlers.len(), "emitting event");
        for handler in handlers {
            handler(event);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.lock();
        let total: usize = registry.handlers.values().map(Vec::len).sum();
        f.debug_struct("Listeners").field("handlers", &total).finish()
    }
}
