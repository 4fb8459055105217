//! Stork HTTP Client
//!
//! A small, type-safe client for the Databricks workspace REST API, covering
//! the library, job and cluster endpoints used for library deployment.
//!
//! Every non-success response is turned into [`ClientError::ApiError`] with a
//! normalized code, whichever error payload generation the endpoint returns.
//!
//! # Example
//!
//! ```no_run
//! use stork_client::WorkspaceClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = WorkspaceClient::new("https://my-org.cloud.databricks.com", "dapi-token");
//!
//!     for job in client.list_jobs().await? {
//!         println!("{} {}", job.job_id, job.settings.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod clusters;
mod jobs;
mod libraries;

pub use error::{ClientError, Result};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// User name for HTTP basic auth with a personal access token
const TOKEN_USER: &str = "token";

/// HTTP client for the workspace API
///
/// Endpoints are grouped by resource:
/// - Libraries: upload, folder listing, status, delete
/// - Jobs: list, get, reset
/// - Clusters: library statuses, install/uninstall, state, start/restart, create
#[derive(Clone)]
pub struct WorkspaceClient {
    /// Base URL of the workspace (e.g., "https://my-org.cloud.databricks.com")
    base_url: String,
    /// API token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for WorkspaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WorkspaceClient {
    /// Create a new workspace client
    ///
    /// # Arguments
    /// * `base_url` - The workspace host (e.g., "https://my-org.cloud.databricks.com")
    /// * `token` - API token used for every request
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new workspace client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the workspace
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .basic_auth(TOKEN_USER, Some(&self.token))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(TOKEN_USER, Some(&self.token))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns a normalized API error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response_body(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed (e.g., delete, reset)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response_body(status.as_u16(), &body));
        }

        Ok(())
    }
}
