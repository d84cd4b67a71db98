//! Manifest writer
//!
//! Persists the bootstrap pod manifest where the kubelet picks it up. Once
//! written, starting (and restarting) etcd is the kubelet's job.

use std::fs::{OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use bootetcd_core::domain::pod::Pod;
use bootetcd_core::target::MANIFEST_MODE;
use tracing::{debug, info};

use crate::error::BootstrapError;

/// Writes a pod manifest to a fixed path
pub struct ManifestWriter {
    path: PathBuf,
}

impl ManifestWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the manifest bytes without touching the filesystem
    pub fn render(&self, pod: &Pod) -> Result<String, BootstrapError> {
        pod.to_yaml().map_err(|source| BootstrapError::Render {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the manifest, replacing any previous content
    ///
    /// The file ends up readable and writable by its owner only, even when
    /// it existed before with wider permissions. Parent directories are
    /// never created.
    pub fn write(&self, pod: &Pod) -> Result<(), BootstrapError> {
        let manifest = self.render(pod)?;

        debug!(
            "Writing {} bytes of manifest to {}",
            manifest.len(),
            self.path.display()
        );

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(MANIFEST_MODE)
            .open(&self.path)
            .map_err(|source| self.provision_error(source))?;

        file.set_permissions(Permissions::from_mode(MANIFEST_MODE))
            .map_err(|source| self.provision_error(source))?;

        file.write_all(manifest.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|source| self.provision_error(source))?;

        info!("Wrote pod manifest {}", self.path.display());

        Ok(())
    }

    fn provision_error(&self, source: std::io::Error) -> BootstrapError {
        BootstrapError::Provision {
            path: self.path.clone(),
            source,
        }
    }
}
