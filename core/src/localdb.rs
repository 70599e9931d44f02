// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod lists;
mod queue;
mod todos;

use std::error::Error;
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use crate::localdb::lists::{ListRecord, Lists};
pub use crate::localdb::queue::Queue;
pub use crate::localdb::todos::{TodoRecord, Todos};
use crate::schema::SCHEMA;

/// The local database: synced tables plus the upload queue.
#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,

    pub lists: Lists,
    pub todos: Todos,
    pub queue: Queue,
}

impl LocalDb {
    /// Opens a sqlite database connection.
    /// If `filename` is `None`, it opens an in-memory database.
    pub async fn open(filename: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let (options, pool_options) = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            let options = SqliteConnectOptions::new()
                .filename(filename.to_str().ok_or("Invalid path encoding")?)
                .create_if_missing(true);
            (options, SqlitePoolOptions::new())
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            // Every connection would get its own in-memory database otherwise.
            let options = SqliteConnectOptions::new().in_memory(true);
            (options, SqlitePoolOptions::new().max_connections(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| format!("Failed to connect to SQLite database: {e}"))?;

        tracing::debug!("ensuring tables in the database");
        Self::create_tables(&pool)
            .await
            .map_err(|e| format!("Failed to create tables: {e}"))?;

        Ok(LocalDb {
            lists: Lists::new(pool.clone()),
            todos: Todos::new(pool.clone()),
            queue: Queue::new(pool.clone()),
            pool,
        })
    }

    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!("closing database connection");
        self.pool.close().await;
        Ok(())
    }

    async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for table in SCHEMA.tables {
            for sql in table.create_sql() {
                sqlx::query(&sql).execute(&mut *tx).await?;
            }
        }
        queue::create_tables(&mut tx).await?;
        tx.commit().await
    }
}
