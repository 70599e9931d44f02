// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

use crate::mutation::{Mutation, MutationBatch, Payload};
use crate::reconciler::{PendingQueue, StoreError};
use crate::schema::SCHEMA;

const SQL_CREATE: &[&str] = &[
    "\
CREATE TABLE IF NOT EXISTS crud_queue (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    tx_id      INTEGER NOT NULL,
    op         TEXT    NOT NULL,
    table_name TEXT    NOT NULL,
    row_id     TEXT    NOT NULL,
    data       TEXT
);",
    "\
CREATE TABLE IF NOT EXISTS crud_tx (
    id         INTEGER PRIMARY KEY CHECK (id = 1),
    next_tx_id INTEGER NOT NULL
);",
    "INSERT OR IGNORE INTO crud_tx (id, next_tx_id) VALUES (1, 1);",
];

pub async fn create_tables(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for sql in SQL_CREATE {
        sqlx::query(sql).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Allocates the id grouping the mutations of one local transaction.
///
/// The update takes the write lock, so concurrent writers get distinct,
/// increasing ids.
pub async fn allocate_tx_id(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    const SQL: &str = "\
UPDATE crud_tx SET next_tx_id = next_tx_id + 1
WHERE id = 1
RETURNING next_tx_id - 1;
";

    let (tx_id,): (i64,) = sqlx::query_as(SQL).fetch_one(&mut *conn).await?;
    Ok(tx_id)
}

/// Appends a mutation to the queue, inside the caller's transaction.
pub async fn record(
    conn: &mut SqliteConnection,
    tx_id: i64,
    mutation: &Mutation,
) -> Result<(), sqlx::Error> {
    const SQL: &str = "\
INSERT INTO crud_queue (tx_id, op, table_name, row_id, data)
VALUES (?, ?, ?, ?, ?);
";

    validate(mutation)?;
    let data = mutation
        .payload
        .as_ref()
        .map(|p| serde_json::Value::Object(p.clone()).to_string());

    sqlx::query(SQL)
        .bind(tx_id)
        .bind(mutation.kind.as_ref())
        .bind(&mutation.table)
        .bind(&mutation.row_id)
        .bind(data)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

fn validate(mutation: &Mutation) -> Result<(), sqlx::Error> {
    let table = SCHEMA
        .table(&mutation.table)
        .ok_or_else(|| sqlx::Error::Protocol(format!("Unknown table: {}", mutation.table)))?;

    if let Some(payload) = &mutation.payload
        && let Some(column) = payload.keys().find(|k| table.column(k).is_none())
    {
        return Err(sqlx::Error::Protocol(format!(
            "Unknown column: {}.{column}",
            table.name
        )));
    }
    Ok(())
}

/// The durable queue of mutations waiting for upload.
#[derive(Debug, Clone)]
pub struct Queue {
    pool: SqlitePool,
}

impl Queue {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of queued mutations across all batches.
    pub async fn pending_count(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM crud_queue;")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// The mutations of the oldest queued transaction.
    pub async fn next_batch(&self) -> Result<Option<MutationBatch>, StoreError> {
        const SQL: &str = "\
SELECT id, tx_id, op, table_name, row_id, data
FROM crud_queue
WHERE tx_id = (SELECT tx_id FROM crud_queue ORDER BY id LIMIT 1)
ORDER BY id;
";

        let rows: Vec<QueueRow> = sqlx::query_as(SQL).fetch_all(&self.pool).await?;
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Ok(None);
        };

        let tx_id = first.tx_id;
        let last_entry_id = last.id;
        let mutations = rows
            .into_iter()
            .map(QueueRow::into_mutation)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MutationBatch {
            tx_id,
            last_entry_id,
            mutations,
        }))
    }

    /// Removes every entry up to the end of the batch.
    pub async fn complete(&self, batch: &MutationBatch) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM crud_queue WHERE id <= ?;")
            .bind(batch.last_entry_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            tx_id = batch.tx_id,
            removed = result.rows_affected(),
            "batch removed from queue"
        );
        Ok(())
    }
}

#[async_trait]
impl PendingQueue for Queue {
    async fn next_pending_batch(&self) -> Result<Option<MutationBatch>, StoreError> {
        self.next_batch().await
    }

    async fn mark_batch_complete(&self, batch: &MutationBatch) -> Result<(), StoreError> {
        Ok(self.complete(batch).await?)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QueueRow {
    id: i64,
    tx_id: i64,
    op: String,
    table_name: String,
    row_id: String,
    data: Option<String>,
}

impl QueueRow {
    fn into_mutation(self) -> Result<Mutation, StoreError> {
        let kind = self.op.parse()?;
        let payload = self
            .data
            .map(|data| serde_json::from_str::<Payload>(&data))
            .transpose()
            .map_err(|e| format!("Invalid payload of queue entry {}: {e}", self.id))?;

        Ok(Mutation {
            table: self.table_name,
            kind,
            row_id: self.row_id,
            payload,
        })
    }
}
