// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Row-level write operations.

use std::sync::Arc;

use reqwest::Method;

use crate::config::RestConfig;
use crate::error::RestError;
use crate::http::HttpClient;
use crate::types::{Row, RowId, TableName};

const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";
const PREFER_MINIMAL: &str = "return=minimal";

/// Client writing single rows to a `PostgREST` endpoint.
///
/// Every operation targets one row by its `id` column, so each call is a
/// single atomic statement on the server.
///
/// # Example
///
/// ```ignore
/// use todosync_rest::{RestClient, RestConfig, Row};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RestConfig {
///     base_url: "https://xyz.supabase.co".to_string(),
///     api_key: Some("anon-key".to_string()),
///     ..Default::default()
/// };
///
/// let client = RestClient::new(config)?;
/// let mut row = Row::new();
/// row.insert("id".to_string(), "3f1c...".into());
/// row.insert("name".to_string(), "Groceries".into());
/// client.upsert(&"lists".into(), &row).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Arc<HttpClient>,
}

impl RestClient {
    /// Creates a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: RestConfig) -> Result<Self, RestError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Inserts the row, or replaces the columns of an existing row with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the row.
    pub async fn upsert(&self, table: &TableName, row: &Row) -> Result<(), RestError> {
        tracing::debug!(%table, "upserting row");
        let url = self.http.table_url(table);
        let body = serde_json::to_vec(row)?;

        self.http
            .execute(
                self.http
                    .build_request(Method::POST, &url)
                    .header("Content-Type", "application/json")
                    .header("Prefer", PREFER_UPSERT)
                    .body(body),
            )
            .await?;

        Ok(())
    }

    /// Updates only the given columns of the row with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the patch.
    pub async fn update(&self, table: &TableName, id: &RowId, patch: &Row) -> Result<(), RestError> {
        tracing::debug!(%table, %id, "updating row");
        let url = self.http.table_url(table);
        let body = serde_json::to_vec(patch)?;

        self.http
            .execute(
                self.http
                    .build_request(Method::PATCH, &url)
                    .query(&[("id", id.eq_filter())])
                    .header("Content-Type", "application/json")
                    .header("Prefer", PREFER_MINIMAL)
                    .body(body),
            )
            .await?;

        Ok(())
    }

    /// Deletes the row with `id`. Deleting a missing row succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses the deletion.
    pub async fn delete(&self, table: &TableName, id: &RowId) -> Result<(), RestError> {
        tracing::debug!(%table, %id, "deleting row");
        let url = self.http.table_url(table);

        self.http
            .execute(
                self.http
                    .build_request(Method::DELETE, &url)
                    .query(&[("id", id.eq_filter())])
                    .header("Prefer", PREFER_MINIMAL),
            )
            .await?;

        Ok(())
    }
}
