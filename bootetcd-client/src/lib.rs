//! Bootetcd HTTP Client
//!
//! A small client for the HTTP API of the bootstrap etcd member. The bootstrap
//! step only needs `GET /version`, used as a readiness probe.
//!
//! # Example
//!
//! ```no_run
//! use bootetcd_client::EtcdClient;
//!
//! #[tokio::main]
//! async fn main() -> bootetcd_client::Result<()> {
//!     let client = EtcdClient::new("http://127.0.0.1:2379");
//!
//!     let response = client.version().await?;
//!     println!("etcd answered with status {}", response.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod version;

// Re-export commonly used types
pub use bootetcd_core::dto::version::EtcdVersion;
pub use error::{ClientError, Result};
pub use version::VersionResponse;

use reqwest::Client;
use std::time::Duration;

/// HTTP client for one etcd member
#[derive(Debug, Clone)]
pub struct EtcdClient {
    /// Base URL of the member (e.g., "http://127.0.0.1:2379")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl EtcdClient {
    /// Create a new client without a request timeout
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the member's client API
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client whose requests are cut after `timeout`
    ///
    /// # Example
    /// ```
    /// use bootetcd_client::EtcdClient;
    /// use std::time::Duration;
    ///
    /// let client = EtcdClient::with_timeout("http://127.0.0.1:2379", Duration::from_secs(10))
    ///     .unwrap();
    /// assert_eq!(client.base_url(), "http://127.0.0.1:2379");
    /// ```
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::BuildFailed(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a client around a configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the member
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
