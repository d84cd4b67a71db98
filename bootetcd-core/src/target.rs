//! Bootstrap target
//!
//! Where the descriptor goes and where the resulting etcd member answers.
//! The probe port is the descriptor's client port; both come from the same
//! constant so they cannot drift apart.

use std::path::{Path, PathBuf};

use crate::domain::pod::ETCD_CLIENT_PORT;

/// Bootstrap etcd manifest inside the kubelet's static pod directory
pub const MANIFEST_PATH: &str = "/etc/kubernetes/manifests/boot-etcd.yaml";

/// Owner read/write only
pub const MANIFEST_MODE: u32 = 0o600;

/// Address the bootstrap member is probed on
pub const PROBE_HOST: &str = "127.0.0.1";

/// Endpoint answering once etcd is serving clients
pub const VERSION_PATH: &str = "/version";

/// The manifest location and the client endpoint of the bootstrap member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapTarget {
    manifest_path: PathBuf,
    client_port: u16,
}

impl BootstrapTarget {
    /// The well-known target used in production
    pub fn well_known() -> Self {
        Self {
            manifest_path: PathBuf::from(MANIFEST_PATH),
            client_port: ETCD_CLIENT_PORT,
        }
    }

    /// Same endpoint, different manifest location
    pub fn with_manifest_path(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = manifest_path.into();
        self
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn client_port(&self) -> u16 {
        self.client_port
    }

    /// Base URL of the member's client API (e.g. "http://127.0.0.1:2379")
    pub fn client_url(&self) -> String {
        format!("http://{}:{}", PROBE_HOST, self.client_port)
    }

    /// Full URL of the readiness probe
    pub fn version_url(&self) -> String {
        format!("{}{}", self.client_url(), VERSION_PATH)
    }
}

impl Default for BootstrapTarget {
    fn default() -> Self {
        Self::well_known()
    }
}
