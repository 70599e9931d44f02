// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Backend client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Transport failure: connection refused, timeout, TLS, etc.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Structured error returned by the backend.
    ///
    /// `code` is a `PostgreSQL` SQLSTATE (e.g. `23505`) or a `PGRST*` code.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend error code.
        code: String,
        /// Human readable message.
        message: String,
        /// Additional details, if any.
        details: Option<String>,
        /// Hint from the database, if any.
        hint: Option<String>,
    },

    /// Non-success status without a structured body.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RestError {
    /// The HTTP status of a rejected request, if the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for RestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
