//! etcd version DTO
//!
//! Body of `GET /version`. Only used for logging; readiness never depends on it.

use serde::{Deserialize, Serialize};

/// Version report of an etcd member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcdVersion {
    /// Version of the member answering the request
    #[serde(rename = "etcdserver")]
    pub server: String,

    /// Cluster-wide version, "not_decided" until the cluster agrees
    #[serde(rename = "etcdcluster")]
    pub cluster: String,
}

impl EtcdVersion {
    /// Parses a `/version` body, returning `None` for anything else
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

impl std::fmt::Display for EtcdVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "server {}, cluster {}", self.server, self.cluster)
    }
}
