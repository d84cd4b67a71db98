//! Bootstrap configuration
//!
//! Where the manifest is written and how the readiness wait is paced.
//! The probe endpoint is not configurable: it follows the client port
//! declared in the manifest.

use std::path::PathBuf;
use std::time::Duration;

use bootetcd_core::target::{BootstrapTarget, MANIFEST_PATH};

/// Upper bound of a single readiness probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between two failed probes
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the static pod manifest (inside the kubelet's manifest directory)
    pub manifest_path: PathBuf,

    /// Maximum time a single probe may take
    pub probe_timeout: Duration,

    /// How long to wait after a failed probe before the next one
    pub retry_interval: Duration,

    /// Give up waiting for etcd after this long; wait forever when unset
    pub ready_deadline: Option<Duration>,
}

impl Config {
    /// Creates a configuration with default timings
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            ready_deadline: None,
        }
    }

    /// Sets a deadline for the readiness wait
    pub fn with_ready_deadline(mut self, deadline: Duration) -> Self {
        self.ready_deadline = Some(deadline);
        self
    }

    /// The manifest location and probe endpoint this configuration targets
    pub fn target(&self) -> BootstrapTarget {
        BootstrapTarget::well_known().with_manifest_path(self.manifest_path.clone())
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.manifest_path.is_absolute() {
            anyhow::bail!("manifest_path must be absolute");
        }

        if self.manifest_path.file_name().is_none() {
            anyhow::bail!("manifest_path must name a file");
        }

        if self.probe_timeout.is_zero() {
            anyhow::bail!("probe_timeout must be greater than 0");
        }

        if self.retry_interval.is_zero() {
            anyhow::bail!("retry_interval must be greater than 0");
        }

        if self.probe_timeout > self.retry_interval {
            anyhow::bail!("probe_timeout cannot exceed retry_interval");
        }

        if self.ready_deadline.is_some_and(|d| d.is_zero()) {
            anyhow::bail!("ready_deadline must be greater than 0 when set");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(MANIFEST_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.manifest_path,
            PathBuf::from("/etc/kubernetes/manifests/boot-etcd.yaml")
        );
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.retry_interval, Duration::from_secs(10));
        assert_eq!(config.ready_deadline, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.manifest_path = PathBuf::from("manifests/boot-etcd.yaml");
        assert!(config.validate().is_err());

        config.manifest_path = PathBuf::from("/");
        assert!(config.validate().is_err());

        config.manifest_path = PathBuf::from("/tmp/boot-etcd.yaml");
        assert!(config.validate().is_ok());

        config.retry_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.retry_interval = Duration::from_secs(5);
        assert!(config.validate().is_err());

        config.probe_timeout = Duration::from_secs(5);
        assert!(config.validate().is_ok());

        config.probe_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ready_deadline() {
        let config = Config::default().with_ready_deadline(Duration::from_secs(300));
        assert_eq!(config.ready_deadline, Some(Duration::from_secs(300)));
        assert!(config.validate().is_ok());

        let config = Config::default().with_ready_deadline(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_follows_manifest_path() {
        let target = Config::new("/tmp/manifests/boot-etcd.yaml").target();
        assert_eq!(
            target.manifest_path(),
            std::path::Path::new("/tmp/manifests/boot-etcd.yaml")
        );
        assert_eq!(target.version_url(), "http://127.0.0.1:2379/version");
    }
}
