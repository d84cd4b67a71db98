//! The bootstrap step
//!
//! Writes the boot-etcd manifest, then waits for the kubelet to bring the
//! member up. Nothing is retried on the write side and nothing is cleaned up
//! afterwards; the manifest stays for the kubelet.

use std::future::Future;

use bootetcd_client::EtcdClient;
use bootetcd_core::domain::pod::Pod;
use bootetcd_core::target::BootstrapTarget;
use tracing::info;

use crate::config::Config;
use crate::error::BootstrapError;
use crate::scheduler::{Readiness, ReadinessWaiter};
use crate::service::{ManifestWriter, ProgressReporter, ReadinessProbe, TracingReporter};

/// Provisions the bootstrap etcd member and waits for it
pub struct Bootstrapper<P, R> {
    pod: Pod,
    writer: ManifestWriter,
    waiter: ReadinessWaiter<P, R>,
}

impl Bootstrapper<EtcdClient, TracingReporter> {
    /// Probes the real member over HTTP and logs progress with tracing
    pub fn from_config(config: &Config) -> Result<Self, BootstrapError> {
        let target = config.target();
        let client = EtcdClient::with_timeout(target.client_url(), config.probe_timeout)?;
        let waiter = ReadinessWaiter::from_config(client, TracingReporter, config);

        Ok(Self::new(&target, waiter))
    }
}

impl<P: ReadinessProbe, R: ProgressReporter> Bootstrapper<P, R> {
    pub fn new(target: &BootstrapTarget, waiter: ReadinessWaiter<P, R>) -> Self {
        Self {
            pod: Pod::boot_etcd(),
            writer: ManifestWriter::new(target.manifest_path()),
            waiter,
        }
    }

    /// The pod handed to the kubelet
    pub fn pod(&self) -> &Pod {
        &self.pod
    }

    /// Writes the manifest without waiting for etcd
    pub fn write_manifest(&self) -> Result<(), BootstrapError> {
        self.writer.write(&self.pod)
    }

    /// Writes the manifest and waits until etcd answers or `cancel` completes
    ///
    /// A failed write returns immediately; no probe is sent in that case.
    pub async fn run<C>(&self, cancel: C) -> Result<Readiness, BootstrapError>
    where
        C: Future<Output = ()>,
    {
        self.write_manifest()?;
        info!("etcd server has been defined to run by kubelet. Please wait...");

        self.waiter.wait_until_ready(cancel).await
    }
}
