//! Readiness waiter
//!
//! Probes until the member answers. Every failure is reported, followed by a
//! fixed pause; there is no attempt limit and no backoff. The only way out
//! besides success is the cancellation future handed in by the caller.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bootetcd_core::dto::version::EtcdVersion;
use tokio::time;
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_PROBE_TIMEOUT, DEFAULT_RETRY_INTERVAL};
use crate::error::{BootstrapError, ProbeError, error_chain};
use crate::service::{ProbeFailure, ProbeResponse, ProgressReporter, ReadinessProbe};

/// Upper bound for reading the version body of a successful probe
const VERSION_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// The member answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    /// Probes issued, including the successful one
    pub attempts: u32,
    /// HTTP status of the successful probe
    pub status: u16,
    /// Version reported by the member, when its body could be parsed
    pub version: Option<EtcdVersion>,
}

#[derive(Debug)]
enum WaitState {
    Probing { attempt: u32 },
    Ready(Readiness),
    /// `attempts` counts finished probes; one cut short by cancellation is not included
    Cancelled { attempts: u32 },
}

/// Waits for the bootstrapped member to answer its probe
pub struct ReadinessWaiter<P, R> {
    probe: P,
    reporter: R,
    probe_timeout: Duration,
    retry_interval: Duration,
}

impl<P: ReadinessProbe, R: ProgressReporter> ReadinessWaiter<P, R> {
    /// Creates a waiter with the default 10s probe timeout and 10s pause
    pub fn new(probe: P, reporter: R) -> Self {
        Self {
            probe,
            reporter,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Creates a waiter paced by the configuration
    pub fn from_config(probe: P, reporter: R, config: &Config) -> Self {
        Self::new(probe, reporter).with_timing(config.probe_timeout, config.retry_interval)
    }

    pub fn with_timing(mut self, probe_timeout: Duration, retry_interval: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self.retry_interval = retry_interval;
        self
    }

    /// Probes until the member answers or `cancel` completes
    ///
    /// Cancellation is observed while a probe is in flight and during the
    /// pause. Pass `std::future::pending()` to wait without limit.
    pub async fn wait_until_ready<C>(&self, cancel: C) -> Result<Readiness, BootstrapError>
    where
        C: Future<Output = ()>,
    {
        info!(
            "Waiting for etcd at {} (probe timeout: {:?}, retry interval: {:?})",
            self.probe.endpoint(),
            self.probe_timeout,
            self.retry_interval
        );

        let mut cancel = std::pin::pin!(cancel);
        let mut state = WaitState::Probing { attempt: 1 };

        loop {
            state = match state {
                WaitState::Probing { attempt } => self.step(attempt, cancel.as_mut()).await,
                WaitState::Ready(readiness) => return Ok(readiness),
                WaitState::Cancelled { attempts } => {
                    info!("Stopped waiting for etcd after {} failed attempt(s)", attempts);
                    return Err(BootstrapError::Cancelled { attempts });
                }
            };
        }
    }

    /// Builds the readiness report for an answered probe
    ///
    /// The member already answered, so a slow or broken body only costs
    /// the version in the report.
    async fn ready(&self, attempt: u32, mut response: ProbeResponse) -> Readiness {
        let version = match response.take_version() {
            Some(read) => match time::timeout(VERSION_READ_TIMEOUT, read).await {
                Ok(version) => version,
                Err(_) => {
                    debug!("No /version body within {:?}", VERSION_READ_TIMEOUT);
                    None
                }
            },
            None => None,
        };

        match &version {
            Some(version) => info!("etcd is up after {} attempt(s) ({})", attempt, version),
            None => info!(
                "etcd is up after {} attempt(s) (status {})",
                attempt, response.status
            ),
        }

        Readiness {
            attempts: attempt,
            status: response.status,
            version,
        }
    }

    /// Runs one probe and, on failure, the pause that follows it
    async fn step<C>(&self, attempt: u32, mut cancel: Pin<&mut C>) -> WaitState
    where
        C: Future<Output = ()>,
    {
        debug!("Probing {} (attempt {})", self.probe.endpoint(), attempt);

        let outcome = tokio::select! {
            biased;
            _ = cancel.as_mut() => return WaitState::Cancelled { attempts: attempt - 1 },
            outcome = time::timeout(self.probe_timeout, self.probe.probe()) => outcome,
        };

        let error = match outcome {
            Ok(Ok(response)) => return WaitState::Ready(self.ready(attempt, response).await),
            Ok(Err(e)) => e,
            Err(_) => ProbeError::TimedOut(self.probe_timeout),
        };

        self.reporter.probe_failed(&ProbeFailure {
            attempt,
            error: error_chain(&error),
            retry_in: self.retry_interval,
        });

        tokio::select! {
            biased;
            _ = cancel.as_mut() => WaitState::Cancelled { attempts: attempt },
            _ = time::sleep(self.retry_interval) => WaitState::Probing {
                attempt: attempt.saturating_add(1),
            },
        }
    }
}
