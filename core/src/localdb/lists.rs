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
use crate::schema::{LISTS, TODOS};
use crate::{ListDraft, TodoList};

#[derive(Debug, Clone)]
pub struct Lists {
    pool: SqlitePool,
}

impl Lists {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a list and queues its upload.
    pub async fn insert(&self, list: &ListRecord) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO lists (id, created_at, name, owner_id)
VALUES (?, ?, ?, ?);
";

        let mut tx = self.pool.begin().await?;
        sqlx::query(SQL)
            .bind(&list.id)
            .bind(&list.created_at)
            .bind(&list.name)
            .bind(&list.owner_id)
            .execute(&mut *tx)
            .await?;

        let tx_id = queue::allocate_tx_id(&mut tx).await?;
        let mutation = Mutation::put(LISTS.name, list.id.as_str(), list.payload());
        queue::record(&mut tx, tx_id, &mutation).await?;

        tx.commit().await
    }

    /// Deletes a list together with its items, queueing one deletion per row.
    ///
    /// Items are queued before the list so the backend never sees dangling
    /// references. Returns `false` if the list does not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let todo_ids: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM todos WHERE list_id = ? ORDER BY rowid;")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let deleted = sqlx::query("DELETE FROM lists WHERE id = ?;")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Ok(false); // dropping the transaction rolls it back
        }

        sqlx::query("DELETE FROM todos WHERE list_id = ?;")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let tx_id = queue::allocate_tx_id(&mut tx).await?;
        for (todo_id,) in &todo_ids {
            queue::record(&mut tx, tx_id, &Mutation::delete(TODOS.name, todo_id.as_str())).await?;
        }
        queue::record(&mut tx, tx_id, &Mutation::delete(LISTS.name, id)).await?;

        tx.commit().await?;
        tracing::debug!(id, todos = todo_ids.len(), "list deleted");
        Ok(true)
    }

    pub async fn get(&self, id: &str) -> Result<Option<ListRecord>, sqlx::Error> {
        let sql = format!("{}WHERE l.id = ?\nGROUP BY l.id;", Self::SQL_SELECT);
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(&self) -> Result<Vec<ListRecord>, sqlx::Error> {
        let sql = format!(
            "{}GROUP BY l.id\nORDER BY l.created_at, l.rowid;",
            Self::SQL_SELECT
        );
        sqlx::query_as(&sql).fetch_all(&self.pool).await
    }

    /// Ids of the lists starting with `prefix`.
    pub async fn ids_with_prefix(&self, prefix: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM lists WHERE substr(id, 1, ?) = ? ORDER BY id;")
                .bind(prefix.len() as i64)
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    const SQL_SELECT: &str = "\
SELECT l.id, l.created_at, l.name, l.owner_id,
       COUNT(t.id) AS total,
       COALESCE(SUM(t.completed), 0) AS done
FROM lists l
LEFT JOIN todos t ON t.list_id = l.id
";
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListRecord {
    id: String,
    created_at: String,
    name: String,
    owner_id: Option<String>,
    total: i64,
    done: i64,
}

impl ListRecord {
    /// A new, empty list with a fresh id.
    pub fn new(draft: &ListDraft, owner_id: Option<String>, now: &Timestamp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now.to_string(),
            name: draft.name.trim().to_string(),
            owner_id,
            total: 0,
            done: 0,
        }
    }

    fn payload(&self) -> Payload {
        payload([
            ("created_at", json!(self.created_at)),
            ("name", json!(self.name)),
            ("owner_id", json!(self.owner_id)),
        ])
    }
}

impl TodoList for ListRecord {
    fn id(&self) -> Cow<'_, str> {
        self.id.as_str().into()
    }

    fn name(&self) -> Cow<'_, str> {
        self.name.as_str().into()
    }

    fn created_at(&self) -> Cow<'_, str> {
        self.created_at.as_str().into()
    }

    fn owner_id(&self) -> Option<Cow<'_, str>> {
        self.owner_id.as_deref().map(Into::into)
    }

    fn total(&self) -> i64 {
        self.total
    }

    fn done(&self) -> i64 {
        self.done
    }
}
