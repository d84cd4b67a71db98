//! Readiness probe
//!
//! One probe is one request against the member's `/version` endpoint. Any
//! HTTP response means the member is up; its status code is not inspected.
//! The probe resolves on the response headers. The body is handed back
//! unread, so a slow body can never turn an answer into a failure.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bootetcd_client::EtcdClient;
use bootetcd_core::dto::version::EtcdVersion;
use bootetcd_core::target::VERSION_PATH;

use crate::error::{ProbeError, error_chain};

/// Deferred read of the version reported in a probe answer
pub type VersionRead = Pin<Box<dyn Future<Output = Option<EtcdVersion>> + Send>>;

/// The endpoint answered
pub struct ProbeResponse {
    /// HTTP status code of the answer
    pub status: u16,
    version: Option<VersionRead>,
}

impl ProbeResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            version: None,
        }
    }

    /// Attaches the read of the answer's body
    pub fn with_version(mut self, read: VersionRead) -> Self {
        self.version = Some(read);
        self
    }

    /// Takes the pending body read, if the answer carries one
    pub fn take_version(&mut self) -> Option<VersionRead> {
        self.version.take()
    }
}

impl std::fmt::Debug for ProbeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeResponse")
            .field("status", &self.status)
            .field("version", &self.version.as_ref().map(|_| "<pending>"))
            .finish()
    }
}

/// A single readiness check against the bootstrapped member
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Where the probe goes, for log messages
    fn endpoint(&self) -> String;

    /// Performs one probe attempt
    ///
    /// Returns `Ok` as soon as the endpoint produced any response and `Err`
    /// on transport failures. Callers bound the attempt with their own
    /// timeout.
    async fn probe(&self) -> Result<ProbeResponse, ProbeError>;
}

#[async_trait]
impl ReadinessProbe for EtcdClient {
    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url(), VERSION_PATH)
    }

    async fn probe(&self) -> Result<ProbeResponse, ProbeError> {
        match self.version().await {
            Ok(response) => Ok(ProbeResponse::new(response.status)
                .with_version(Box::pin(response.read_version()))),
            Err(e) if e.is_connect() => Err(ProbeError::Unreachable(error_chain(&e))),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<P: ReadinessProbe + ?Sized> ReadinessProbe for Arc<P> {
    fn endpoint(&self) -> String {
        (**self).endpoint()
    }

    async fn probe(&self) -> Result<ProbeResponse, ProbeError> {
        (**self).probe().await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etcd_client_endpoint() {
        let client = EtcdClient::new("http://127.0.0.1:2379");
        assert_eq!(
            ReadinessProbe::endpoint(&client),
            "http://127.0.0.1:2379/version"
        );
    }

    #[tokio::test]
    async fn test_etcd_client_probe_reports_refused_connection() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = EtcdClient::new(format!("http://{}", addr));
        let err = client.probe().await.unwrap_err();

        assert!(matches!(err, ProbeError::Unreachable(_)));
        assert!(err.to_string().starts_with("not accepting connections: "));
    }
}
