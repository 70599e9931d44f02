// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Authentication method sent with every request.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(tag = "type")]
pub enum AuthMethod {
    /// No authentication header, only the `apikey` (if any).
    #[serde(rename = "none")]
    #[default]
    None,
    /// Basic authentication (username/password), for backends behind a proxy.
    #[serde(rename = "basic")]
    Basic {
        /// Username for authentication.
        username: String,
        /// Password for authentication.
        password: String,
    },
    /// Bearer token authentication (a user JWT).
    #[serde(rename = "bearer")]
    Bearer {
        /// Bearer token.
        token: String,
    },
}

/// Backend server configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RestConfig {
    /// Base URL of the backend, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Path prefix of the REST endpoint.
    #[serde(default = "default_rest_path")]
    pub rest_path: String,
    /// Project API key, sent as the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Authentication method.
    #[serde(default)]
    pub auth: AuthMethod,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_rest_path() -> String {
    "/rest/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("todosync-rest/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            rest_path: default_rest_path(),
            api_key: None,
            auth: AuthMethod::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
