// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Offline-first to-do lists: a local store that queues every change, and
//! the reconciler that replays the queue against a remote backend.

mod app;
mod config;
mod connector;
mod events;
mod fault;
mod localdb;
mod mutation;
mod reconciler;
mod scheduler;
mod schema;
mod todo;

pub use crate::app::TodoApp;
pub use crate::config::{APP_NAME, Config, ConfigDuration, UploadConfig, expand_path, get_config_dir};
pub use crate::connector::{FAULT_CLIENT, FAULT_NETWORK, RestBackend, fault_from_rest_error};
pub use crate::events::{ListenerHandle, Listeners, SyncEvent, SyncEventKind};
pub use crate::fault::{DEFAULT_PERMANENT_CODES, Fault, FaultClass, FaultClassifier, FaultRule};
pub use crate::localdb::{ListRecord, Lists, LocalDb, Queue, TodoRecord, Todos};
pub use crate::mutation::{Mutation, MutationBatch, MutationKind, Payload, payload};
pub use crate::reconciler::{
    PendingQueue, ReconcileOutcome, RemoteBackend, StoreError, UploadError, UploadReconciler,
};
pub use crate::scheduler::{DrainError, DrainSummary, UploadScheduler, backoff_delay};
pub use crate::schema::{Column, ColumnType, Index, LISTS, SCHEMA, Schema, TODOS, Table};
pub use crate::todo::{ListDraft, Todo, TodoDraft, TodoList};
pub use todosync_rest::{AuthMethod, RestConfig};
