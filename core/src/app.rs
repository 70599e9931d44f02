// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::future::Future;

use jiff::Timestamp;
use tokio::fs;

use crate::connector::RestBackend;
use crate::events::{Listeners, SyncEvent};
use crate::localdb::{ListRecord, LocalDb, Queue, TodoRecord};
use crate::reconciler::UploadReconciler;
use crate::scheduler::{DrainSummary, UploadScheduler};
use crate::{Config, ListDraft, Todo, TodoDraft, TodoList};

type Scheduler = UploadScheduler<Queue, RestBackend>;

/// Offline-first to-do application core.
///
/// Every change is written to the local database first and queued for upload
/// in the same transaction. Uploading needs a configured backend; without one
/// the queue just grows.
#[derive(Debug)]
pub struct TodoApp {
    config: Config,
    db: LocalDb,
    listeners: Listeners,
    scheduler: Option<Scheduler>,
}

impl TodoApp {
    /// Creates a new instance with the given configuration.
    pub async fn new(config: Config) -> Result<Self, Box<dyn Error>> {
        Self::with_listeners(config, Listeners::new()).await
    }

    /// Creates a new instance that reports sync events to `listeners`.
    ///
    /// Listeners subscribed beforehand also see the `Initialized` event.
    pub async fn with_listeners(
        mut config: Config,
        listeners: Listeners,
    ) -> Result<Self, Box<dyn Error>> {
        config.normalize()?;
        prepare(&config).await?;

        let db = LocalDb::open(config.db_path().as_deref())
            .await
            .map_err(|e| format!("Failed to initialize db: {e}"))?;

        let scheduler = match &config.backend {
            Some(backend) => {
                let backend = RestBackend::new(backend.clone())
                    .map_err(|e| format!("Failed to initialize backend: {e}"))?;
                let reconciler = UploadReconciler::new(db.queue.clone(), backend)
                    .with_classifier(config.classifier()?)
                    .with_listeners(listeners.clone());
                Some(UploadScheduler::new(
                    reconciler,
                    config.upload.interval.get(),
                    config.upload.retry_delay.get(),
                ))
            }
            None => {
                tracing::info!("no backend configured, changes stay local");
                None
            }
        };

        listeners.emit(&SyncEvent::Initialized);
        Ok(Self {
            config,
            db,
            listeners,
            scheduler,
        })
    }

    /// The registry sync events are emitted to.
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Whether a backend is configured.
    pub fn is_connected(&self) -> bool {
        self.scheduler.is_some()
    }

    /// All lists, oldest first, with their item counts.
    pub async fn lists(&self) -> Result<Vec<ListRecord>, Box<dyn Error>> {
        Ok(self.db.lists.list().await?)
    }

    /// Creates a list owned by the configured user.
    pub async fn new_list(&self, draft: ListDraft) -> Result<ListRecord, Box<dyn Error>> {
        draft.validate()?;
        let list = ListRecord::new(&draft, self.config.user_id.clone(), &Timestamp::now());
        self.db
            .lists
            .insert(&list)
            .await
            .map_err(|e| format!("Failed to create list: {e}"))?;
        self.wake();

        // reload for the item counts
        let reloaded = self.db.lists.get(&list.id()).await?;
        Ok(reloaded.unwrap_or(list))
    }

    /// Deletes a list together with its items.
    pub async fn remove_list(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let id = self.resolve_list_id(id).await?;
        if !self.db.lists.delete(&id).await? {
            return Err(format!("List not found: {id}").into());
        }
        self.wake();
        Ok(())
    }

    /// The items of a list, oldest first.
    pub async fn todos(&self, list_id: &str) -> Result<Vec<TodoRecord>, Box<dyn Error>> {
        let list_id = self.resolve_list_id(list_id).await?;
        Ok(self.db.todos.list(&list_id).await?)
    }

    /// Adds an item to a list, created by the configured user.
    pub async fn new_todo(&self, mut draft: TodoDraft) -> Result<TodoRecord, Box<dyn Error>> {
        draft.validate()?;
        draft.list_id = self.resolve_list_id(&draft.list_id).await?;

        let todo = TodoRecord::new(&draft, self.config.user_id.clone(), &Timestamp::now());
        self.db
            .todos
            .insert(&todo)
            .await
            .map_err(|e| format!("Failed to create todo: {e}"))?;
        self.wake();
        Ok(todo)
    }

    /// Flips the completion state of an item.
    pub async fn toggle_todo(&self, id: &str) -> Result<TodoRecord, Box<dyn Error>> {
        let id = self.resolve_todo_id(id).await?;
        let todo = self
            .db
            .todos
            .get(&id)
            .await?
            .ok_or_else(|| format!("Todo not found: {id}"))?;
        self.set_todo_completed(&id, !todo.completed()).await
    }

    /// Marks an item completed or open, recording the configured user as
    /// the one who completed it.
    pub async fn set_todo_completed(
        &self,
        id: &str,
        completed: bool,
    ) -> Result<TodoRecord, Box<dyn Error>> {
        let id = self.resolve_todo_id(id).await?;
        let by = self.config.user_id.as_deref();
        let todo = self
            .db
            .todos
            .set_completed(&id, completed, by, &Timestamp::now())
            .await
            .map_err(|e| format!("Failed to update todo: {e}"))?
            .ok_or_else(|| format!("Todo not found: {id}"))?;
        self.wake();
        Ok(todo)
    }

    /// Deletes an item.
    pub async fn remove_todo(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let id = self.resolve_todo_id(id).await?;
        if !self.db.todos.delete(&id).await? {
            return Err(format!("Todo not found: {id}").into());
        }
        self.wake();
        Ok(())
    }

    /// Resolves a full list id or a unique prefix of one.
    pub async fn resolve_list_id(&self, id: &str) -> Result<String, Box<dyn Error>> {
        let ids = self.db.lists.ids_with_prefix(id).await?;
        resolve("list", id, ids)
    }

    /// Resolves a full item id or a unique prefix of one.
    pub async fn resolve_todo_id(&self, id: &str) -> Result<String, Box<dyn Error>> {
        let ids = self.db.todos.ids_with_prefix(id).await?;
        resolve("todo", id, ids)
    }

    /// Number of queued mutations not yet uploaded.
    pub async fn pending_uploads(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self.db.queue.pending_count().await?)
    }

    /// Uploads pending changes until the queue is empty.
    ///
    /// A transient fault stops the upload with a [`DrainError`](crate::DrainError) carrying
    /// the batches handled so far; the remaining changes stay queued for the
    /// next attempt.
    pub async fn upload(&mut self) -> Result<DrainSummary, Box<dyn Error>> {
        let scheduler = self.scheduler.as_mut().ok_or("No backend configured")?;
        Ok(scheduler.drain().await?)
    }

    /// Keeps uploading in the background until `shutdown` resolves.
    pub async fn watch<F>(&mut self, shutdown: F) -> Result<DrainSummary, Box<dyn Error>>
    where
        F: Future<Output = ()>,
    {
        let scheduler = self.scheduler.as_mut().ok_or("No backend configured")?;
        Ok(scheduler.run(shutdown).await)
    }

    /// Close the application, ensuring all resources are cleaned up.
    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        self.db.close().await
    }

    fn wake(&self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.trigger().notify_one();
        }
    }
}

fn resolve(kind: &str, id: &str, ids: Vec<String>) -> Result<String, Box<dyn Error>> {
    if id.is_empty() {
        return Err(format!("Empty {kind} id").into());
    }
    if ids.iter().any(|a| a == id) {
        return Ok(id.to_string());
    }

    let mut ids = ids.into_iter();
    match (ids.next(), ids.next()) {
        (Some(full), None) => Ok(full),
        (None, _) => Err(format!("No {kind} matches id: {id}").into()),
        (Some(_), Some(_)) => Err(format!("Ambiguous {kind} id: {id}").into()),
    }
}

async fn prepare(config: &Config) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = &config.state_dir {
        tracing::debug!(path = %parent.display(), "ensuring state directory exists");
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
