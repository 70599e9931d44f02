// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use std::path::Path;

use serde_json::json;
use todosync_core::{Config, Mutation, MutationBatch, RestConfig, payload};

/// A batch of the given mutations, as one local transaction.
#[must_use]
pub fn batch(tx_id: i64, mutations: Vec<Mutation>) -> MutationBatch {
    MutationBatch {
        tx_id,
        last_entry_id: tx_id * 100 + mutations.len() as i64,
        mutations,
    }
}

#[must_use]
pub fn put_list(id: &str, name: &str) -> Mutation {
    Mutation::put(
        "lists",
        id,
        payload([
            ("name", json!(name)),
            ("created_at", json!("2026-01-01T00:00:00Z")),
        ]),
    )
}

#[must_use]
pub fn put_todo(id: &str, list_id: &str, description: &str) -> Mutation {
    Mutation::put(
        "todos",
        id,
        payload([
            ("list_id", json!(list_id)),
            ("description", json!(description)),
            ("completed", json!(false)),
        ]),
    )
}

#[must_use]
pub fn patch_todo(id: &str, completed: bool) -> Mutation {
    Mutation::patch("todos", id, payload([("completed", json!(completed))]))
}

#[must_use]
pub fn delete_row(table: &str, id: &str) -> Mutation {
    Mutation::delete(table, id)
}

/// Builder for test configurations.
#[derive(Debug, Default)]
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        let mut config = Config::default();
        config.state_dir = Some(state_dir.to_path_buf());
        Self { config }
    }

    #[must_use]
    pub fn user(mut self, user_id: &str) -> Self {
        self.config.user_id = Some(user_id.to_string());
        self
    }

    #[must_use]
    pub fn backend(mut self, base_url: &str) -> Self {
        self.config.backend = Some(RestConfig {
            base_url: base_url.to_string(),
            api_key: Some("anon-key".to_string()),
            ..RestConfig::default()
        });
        self
    }

    #[must_use]
    pub fn permanent_code(mut self, pattern: &str) -> Self {
        self.config.upload.permanent_codes.push(pattern.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
