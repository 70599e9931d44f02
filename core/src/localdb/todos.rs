// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use jiff::Timestamp;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::localdb::queue;
use crate::mutation::{Mutation, Payload, payload};
use crate::schema::TODOS;
use crate::{Todo, TodoDraft};

#[derive(Debug, Clone)]
pub struct Todos {
    pool: SqlitePool,
}

impl Todos {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts an item and queues its upload.
    pub async fn insert(&self, todo: &TodoRecord) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO todos (id, list_id, created_at, completed_at, description, completed, created_by, completed_by)
VALUES (?, ?, ?, ?, ?, ?, ?, ?);
";

        let mut tx = self.pool.begin().await?;
        sqlx::query(SQL)
            .bind(&todo.id)
            .bind(&todo.list_id)
            .bind(&todo.created_at)
            .bind(&todo.completed_at)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(&todo.created_by)
            .bind(&todo.completed_by)
            .execute(&mut *tx)
            .await?;

        let tx_id = queue::allocate_tx_id(&mut tx).await?;
        let mutation = Mutation::put(TODOS.name, todo.id.as_str(), todo.payload());
        queue::record(&mut tx, tx_id, &mutation).await?;

        tx.commit().await
    }

    /// Marks an item completed or open, and queues a partial update of the
    /// completion columns. Returns `None` if the item does not exist.
    pub async fn set_completed(
        &self,
        id: &str,
        completed: bool,
        by: Option<&str>,
        now: &Timestamp,
    ) -> Result<Option<TodoRecord>, sqlx::Error> {
        const SQL: &str = "\
UPDATE todos SET
    completed    = ?,
    completed_at = ?,
    completed_by = ?
WHERE id = ?;
";

        let (completed_at, completed_by) = match completed {
            true => (Some(now.to_string()), by.map(str::to_string)),
            false => (None, None),
        };

        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query(SQL)
            .bind(completed)
            .bind(&completed_at)
            .bind(&completed_by)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Ok(None);
        }

        let patch = payload([
            ("completed", json!(completed)),
            ("completed_at", json!(completed_at)),
            ("completed_by", json!(completed_by)),
        ]);
        let tx_id = queue::allocate_tx_id(&mut tx).await?;
        queue::record(&mut tx, tx_id, &Mutation::patch(TODOS.name, id, patch)).await?;

        let todo = sqlx::query_as(Self::SQL_SELECT_ONE)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(todo))
    }

    /// Deletes an item and queues its deletion. Returns `false` if it does not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM todos WHERE id = ?;")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Ok(false);
        }

        let tx_id = queue::allocate_tx_id(&mut tx).await?;
        queue::record(&mut tx, tx_id, &Mutation::delete(TODOS.name, id)).await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn get(&self, id: &str) -> Result<Option<TodoRecord>, sqlx::Error> {
        sqlx::query_as(Self::SQL_SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Items of a list, oldest first.
    pub async fn list(&self, list_id: &str) -> Result<Vec<TodoRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT id, list_id, created_at, completed_at, description, completed, created_by, completed_by
FROM todos
WHERE list_id = ?
ORDER BY created_at, rowid;
";

        sqlx::query_as(SQL)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Ids of the items starting with `prefix`.
    pub async fn ids_with_prefix(&self, prefix: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM todos WHERE substr(id, 1, ?) = ? ORDER BY id;")
                .bind(prefix.len() as i64)
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    const SQL_SELECT_ONE: &str = "\
SELECT id, list_id, created_at, completed_at, description, completed, created_by, completed_by
FROM todos
WHERE id = ?;
";
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRecord {
    id: String,
    list_id: String,
    created_at: String,
    completed_at: Option<String>,
    description: String,
    completed: bool,
    created_by: Option<String>,
    completed_by: Option<String>,
}

impl TodoRecord {
    /// A new, open item with a fresh id.
    pub fn new(draft: &TodoDraft, created_by: Option<String>, now: &Timestamp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            list_id: draft.list_id.clone(),
            created_at: now.to_string(),
            completed_at: None,
            description: draft.description.trim().to_string(),
            completed: false,
            created_by,
            completed_by: None,
        }
    }

    fn payload(&self) -> Payload {
        payload([
            ("list_id", json!(self.list_id)),
            ("created_at", json!(self.created_at)),
            ("completed_at", json!(self.completed_at)),
            ("description", json!(self.description)),
            ("completed", json!(self.completed)),
            ("created_by", json!(self.created_by)),
            ("completed_by", json!(self.completed_by)),
        ])
    }
}

impl Todo for TodoRecord {
    fn id(&self) -> Cow<'_, str> {
        self.id.as_str().into()
    }

    fn list_id(&self) -> Cow<'_, str> {
        self.list_id.as_str().into()
    }

    fn description(&self) -> Cow<'_, str> {
        self.description.as_str().into()
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn created_at(&self) -> Cow<'_, str> {
        self.created_at.as_str().into()
    }

    fn completed_at(&self) -> Option<Cow<'_, str>> {
        self.completed_at.as_deref().map(Into::into)
    }

    fn created_by(&self) -> Option<Cow<'_, str>> {
        self.created_by.as_deref().map(Into::into)
    }

    fn completed_by(&self) -> Option<Cow<'_, str>> {
        self.completed_by.as_deref().map(Into::into)
    }
}
