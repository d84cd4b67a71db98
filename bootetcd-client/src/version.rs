//! Version endpoint

use bootetcd_core::dto::version::EtcdVersion;
use bootetcd_core::target::VERSION_PATH;
use tracing::debug;

use crate::EtcdClient;
use crate::error::Result;

/// A `GET /version` whose response headers have arrived
///
/// The body is still unread; `read_version` consumes it.
#[derive(Debug)]
pub struct VersionResponse {
    /// HTTP status code of the response
    pub status: u16,
    response: reqwest::Response,
}

impl VersionResponse {
    /// Reads the body and parses it as etcd's version JSON
    ///
    /// Returns `None` for non-2xx responses, unreadable bodies and bodies of
    /// any other shape. Callers wanting a bound on the read apply their own.
    pub async fn read_version(self) -> Option<EtcdVersion> {
        if !self.response.status().is_success() {
            return None;
        }

        match self.response.text().await {
            Ok(body) => EtcdVersion::parse(&body),
            Err(e) => {
                debug!("Failed to read /version body: {}", e);
                None
            }
        }
    }
}

impl EtcdClient {
    /// Query the member's version
    ///
    /// Resolves as soon as response headers arrive, whatever the status
    /// code. Only transport failures (refused connection, timeout, broken
    /// connection) are errors.
    pub async fn version(&self) -> Result<VersionResponse> {
        let url = format!("{}{}", self.base_url, VERSION_PATH);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!("GET {} returned {}", url, status);

        Ok(VersionResponse {
            status: status.as_u16(),
            response,
        })
    }
}
