// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Adapter from queued mutations to the REST client.

use async_trait::async_trait;
use todosync_rest::{RestClient, RestConfig, RestError, RowId, TableName};

use crate::fault::Fault;
use crate::mutation::{Mutation, MutationKind};
use crate::reconciler::RemoteBackend;

/// Fault code used when the backend could not be reached.
pub const FAULT_NETWORK: &str = "NETWORK";

/// Fault code used when the request could not be built locally.
pub const FAULT_CLIENT: &str = "CLIENT";

/// Remote backend speaking the relational REST protocol.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: RestClient,
}

impl RestBackend {
    /// Creates a backend from the connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: RestConfig) -> Result<Self, RestError> {
        Ok(Self {
            client: RestClient::new(config)?,
        })
    }

    async fn send(&self, mutation: &Mutation) -> Result<(), RestError> {
        let table = TableName::from(mutation.table.as_str());
        let id = RowId::from(mutation.row_id.as_str());

        match mutation.kind {
            MutationKind::Put => {
                let mut row = mutation.payload.clone().unwrap_or_default();
                row.insert("id".to_string(), mutation.row_id.clone().into());
                self.client.upsert(&table, &row).await
            }
            MutationKind::Patch => match &mutation.payload {
                Some(patch) if !patch.is_empty() => self.client.update(&table, &id, patch).await,
                _ => {
                    tracing::debug!(%table, %id, "empty patch, nothing to send");
                    Ok(())
                }
            },
            MutationKind::Delete => self.client.delete(&table, &id).await,
        }
    }
}

#[async_trait]
impl RemoteBackend for RestBackend {
    async fn apply(&self, mutation: &Mutation) -> Result<(), Fault> {
        self.send(mutation).await.map_err(|e| fault_from_rest_error(&e))
    }
}

/// Maps a client error to the fault code the classifier matches on.
///
/// Structured rejections carry the database error code; bare statuses become
/// `HTTP<status>`, so they fall through to the transient default.
pub fn fault_from_rest_error(err: &RestError) -> Fault {
    tracing::debug!(status = ?err.status(), %err, "backend rejected mutation");
    match err {
        RestError::Api { code, message, .. } => Fault::new(code.as_str(), message.as_str()),
        RestError::Status { status, body } => Fault::new(format!("HTTP{status}"), body.as_str()),
        RestError::Http(message) => Fault::new(FAULT_NETWORK, message.as_str()),
        other => Fault::new(FAULT_CLIENT, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_the_database_code() {
        let err = RestError::Api {
            status: 409,
            code: "23505".to_string(),
            message: "duplicate key value".to_string(),
            details: None,
            hint: None,
        };
        let fault = fault_from_rest_error(&err);
        assert_eq!(fault.code, "23505");
        assert_eq!(fault.message, "duplicate key value");
    }

    #[test]
    fn bare_statuses_and_transport_errors_get_synthetic_codes() {
        let err = RestError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(fault_from_rest_error(&err).code, "HTTP503");

        let err = RestError::Http("connection refused".to_string());
        assert_eq!(fault_from_rest_error(&err).code, FAULT_NETWORK);

        let err = RestError::Json("bad".to_string());
        assert_eq!(fault_from_rest_error(&err).code, FAULT_CLIENT);
    }
}
