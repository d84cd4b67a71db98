//! Error types for the bootstrap step

use std::path::PathBuf;
use std::time::Duration;

use bootetcd_client::ClientError;
use thiserror::Error;

/// Errors ending the bootstrap step
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The manifest could not be serialized
    #[error("failed to render manifest for '{}': {source}", .path.display())]
    Render {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The manifest could not be written to its target path
    #[error("failed to write file '{}': {source}", .path.display())]
    Provision {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The HTTP client for the probe could not be built
    #[error("failed to set up etcd probe: {0}")]
    Client(#[from] ClientError),

    /// The wait was cancelled before etcd answered
    #[error("stopped waiting for etcd after {attempts} failed attempt(s)")]
    Cancelled { attempts: u32 },
}

/// Why a single readiness probe failed
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Transport failure reported by the etcd client
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The probe did not finish within its time bound
    #[error("probe timed out after {0:?}")]
    TimedOut(Duration),

    /// Nothing is listening on the endpoint yet
    #[error("not accepting connections: {0}")]
    Unreachable(String),
}

/// Formats an error with its sources, skipping causes already in the message
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
