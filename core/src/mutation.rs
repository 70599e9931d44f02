// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

/// Column values carried by a mutation.
pub type Payload = Map<String, Value>;

/// The kind of change recorded for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Create the row, or replace it if it already exists.
    Put,
    /// Update only the columns present in the payload.
    Patch,
    /// Delete the row.
    Delete,
}

const KIND_PUT: &str = "PUT";
const KIND_PATCH: &str = "PATCH";
const KIND_DELETE: &str = "DELETE";

impl AsRef<str> for MutationKind {
    fn as_ref(&self) -> &str {
        match self {
            MutationKind::Put => KIND_PUT,
            MutationKind::Patch => KIND_PATCH,
            MutationKind::Delete => KIND_DELETE,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for MutationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KIND_PUT => Ok(MutationKind::Put),
            KIND_PATCH => Ok(MutationKind::Patch),
            KIND_DELETE => Ok(MutationKind::Delete),
            _ => Err(format!("Invalid mutation kind: {s}")),
        }
    }
}

/// One recorded change to a row of a synced table.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// The target table.
    pub table: String,
    /// The kind of change.
    pub kind: MutationKind,
    /// The primary key of the row.
    pub row_id: String,
    /// The new column values, absent for deletions.
    pub payload: Option<Payload>,
}

impl Mutation {
    /// A create-or-replace of the whole row.
    pub fn put(table: impl Into<String>, row_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            table: table.into(),
            kind: MutationKind::Put,
            row_id: row_id.into(),
            payload: Some(payload),
        }
    }

    /// A partial update of the given columns.
    pub fn patch(table: impl Into<String>, row_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            table: table.into(),
            kind: MutationKind::Patch,
            row_id: row_id.into(),
            payload: Some(payload),
        }
    }

    /// A deletion of the row.
    pub fn delete(table: impl Into<String>, row_id: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: MutationKind::Delete,
            row_id: row_id.into(),
            payload: None,
        }
    }
}

/// The mutations of one local transaction, in commit order.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationBatch {
    /// The local transaction the mutations were recorded in.
    pub tx_id: i64,
    /// The highest queue entry covered by this batch.
    pub last_entry_id: i64,
    /// The mutations, in the order they must be replayed.
    pub mutations: Vec<Mutation>,
}

impl MutationBatch {
    /// Number of mutations in the batch.
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Whether the batch holds no mutations.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Builds a payload from column/value pairs.
pub fn payload<I, K>(columns: I) -> Payload
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    columns.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
