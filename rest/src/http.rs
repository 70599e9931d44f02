// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and error decoding.

use reqwest::{Client, RequestBuilder, Response};

use crate::config::{AuthMethod, RestConfig};
use crate::error::RestError;

/// Error body returned by `PostgREST`.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    #[serde(default)]
    message: String,
    details: Option<String>,
    hint: Option<String>,
}

/// HTTP client for backend operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: RestConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: RestConfig) -> Result<Self, RestError> {
        if config.base_url.is_empty() {
            return Err(RestError::Config("base_url must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a request with the api key and authentication headers.
    pub fn build_request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        if let Some(api_key) = &self.config.api_key {
            req = req.header("apikey", api_key);
        }

        match &self.config.auth {
            AuthMethod::Basic { username, password } => {
                req = req.basic_auth(username, Some(password));
            }
            AuthMethod::Bearer { token } => {
                req = req.bearer_auth(token);
            }
            AuthMethod::None => {}
        }

        req
    }

    /// Executes a request and decodes backend errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns a non-success status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, RestError> {
        let resp = req.send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(ApiErrorBody {
                code: Some(code),
                message,
                details,
                hint,
            }) => Err(RestError::Api {
                status: status.as_u16(),
                code,
                message,
                details,
                hint,
            }),
            _ => Err(RestError::Status {
                status: status.as_u16(),
                body: text,
            }),
        }
    }

    /// Builds the full URL of a table endpoint.
    pub fn table_url(&self, table: &str) -> String {
        format!(
            "{}{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.rest_path.trim_end_matches('/'),
            table
        )
    }
}
