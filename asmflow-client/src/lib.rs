//! Asmflow HTTP Client
//!
//! A type-safe HTTP client for a Galaxy-compatible execution service.
//!
//! The service owns histories (workspaces), datasets and jobs; this crate
//! exposes its API as typed methods and as the [`GalaxyApi`] trait so the
//! pipeline layer can run against a scripted fake in tests.
//!
//! # Example
//!
//! ```no_run
//! use asmflow_client::GalaxyClient;
//!
//! # async fn example() -> asmflow_client::Result<()> {
//! let client = GalaxyClient::new("https://usegalaxy.org", "my-api-key");
//!
//! let history = client.create_history("assembly run").await?;
//! println!("Created history: {}", history.id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
mod datasets;
mod histories;
mod jobs;
mod tools;
mod users;

// Re-export commonly used types
pub use api::GalaxyApi;
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Header the service expects the API key in.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for a Galaxy-compatible execution service
///
/// Methods are organized into endpoint groups:
/// - History management (create, list, contents)
/// - Tool invocation (upload, run, schema)
/// - Job inspection
/// - Dataset inspection and download
/// - Current user
#[derive(Debug, Clone)]
pub struct GalaxyClient {
    /// Base URL of the service (e.g. "https://usegalaxy.org")
    base_url: String,
    /// API key sent with every request
    api_key: String,
    /// HTTP client instance
    client: Client,
}

impl GalaxyClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service
    /// * `api_key` - The API key identifying the account
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A GET request builder with the API key attached.
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).header(API_KEY_HEADER, &self.api_key)
    }

    /// A POST request builder with the API key attached.
    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url).header(API_KEY_HEADER, &self.api_key)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the request
    /// failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is returned raw (downloads).
    async fn handle_bytes_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
