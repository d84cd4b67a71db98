//! Bootetcd
//!
//! One step of a cluster bring-up: start a temporary, single-member etcd
//! through the kubelet and wait for it to answer.
//!
//! Architecture:
//! - Configuration: manifest location and probe pacing
//! - Services: manifest writer, readiness probe, progress reporting
//! - Scheduler: the readiness wait loop
//! - Bootstrap: the write-then-wait sequence exposed to callers
//!
//! The manifest lands in the kubelet's static pod directory. From then on the
//! kubelet owns the pod; this crate only polls `http://127.0.0.1:2379/version`
//! until etcd responds.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;

pub use bootstrap::Bootstrapper;
pub use config::Config;
pub use error::{BootstrapError, ProbeError};
pub use scheduler::{Readiness, ReadinessWaiter};

/// Starts the bootstrap etcd member and blocks until it answers
///
/// Uses the well-known manifest path and endpoint, logs progress with
/// tracing, and waits without limit. Fails only when the manifest cannot be
/// written (or the HTTP client cannot be built).
pub async fn start_etcd() -> Result<(), BootstrapError> {
    Bootstrapper::from_config(&Config::default())?
        .run(std::future::pending())
        .await?;

    Ok(())
}
