//! Bootetcd CLI
//!
//! Writes the boot-etcd static pod manifest and waits until the kubelet has
//! the member answering on 127.0.0.1:2379.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bootetcd::{Bootstrapper, Config};
use bootetcd_core::domain::pod::Pod;
use bootetcd_core::target::MANIFEST_PATH;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bootetcd")]
#[command(about = "Start a temporary etcd member through the kubelet", long_about = None)]
struct Cli {
    /// Where to write the static pod manifest
    #[arg(long, env = "BOOTETCD_MANIFEST_PATH", default_value = MANIFEST_PATH)]
    manifest_path: PathBuf,

    /// Upper bound of a single readiness probe, in seconds
    #[arg(long, env = "BOOTETCD_PROBE_TIMEOUT", default_value_t = 10)]
    probe_timeout: u64,

    /// Pause after a failed probe, in seconds
    #[arg(long, env = "BOOTETCD_RETRY_INTERVAL", default_value_t = 10)]
    retry_interval: u64,

    /// Give up after this many seconds (waits forever when unset)
    #[arg(long, env = "BOOTETCD_READY_DEADLINE")]
    ready_deadline: Option<u64>,

    /// Print the manifest and exit without writing it
    #[arg(long)]
    print_manifest: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new(self.manifest_path.clone());
        config.probe_timeout = Duration::from_secs(self.probe_timeout);
        config.retry_interval = Duration::from_secs(self.retry_interval);
        config.ready_deadline = self.ready_deadline.map(Duration::from_secs);
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bootetcd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.print_manifest {
        let manifest = Pod::boot_etcd()
            .to_yaml()
            .context("Failed to render manifest")?;
        print!("{}", manifest);
        return Ok(());
    }

    let config = cli.config();
    config.validate()?;
    info!(
        "Loaded configuration: manifest_path={}, probe_timeout={:?}, retry_interval={:?}",
        config.manifest_path.display(),
        config.probe_timeout,
        config.retry_interval
    );

    let bootstrapper =
        Bootstrapper::from_config(&config).context("Failed to set up etcd bootstrap")?;

    let readiness = bootstrapper
        .run(stop_signal(config.ready_deadline))
        .await
        .context("etcd bootstrap failed")?;

    info!(
        "Bootstrap etcd is ready after {} attempt(s)",
        readiness.attempts
    );

    Ok(())
}

/// Completes on Ctrl-C or when the deadline passes
async fn stop_signal(deadline: Option<Duration>) {
    let deadline = async {
        match deadline {
            Some(deadline) => {
                tokio::time::sleep(deadline).await;
                warn!("etcd did not come up within {:?}", deadline);
            }
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = interrupted() => info!("Interrupted"),
        _ = deadline => {}
    }
}

async fn interrupted() {
    if let Err(e) = signal::ctrl_c().await {
        // Without a signal handler only the deadline can stop the wait
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["bootetcd"]).unwrap();
        let config = cli.config();

        assert_eq!(config.manifest_path, PathBuf::from(MANIFEST_PATH));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert_eq!(config.retry_interval, Duration::from_secs(10));
        assert_eq!(config.ready_deadline, None);
        assert!(!cli.print_manifest);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "bootetcd",
            "--manifest-path",
            "/tmp/boot-etcd.yaml",
            "--probe-timeout",
            "2",
            "--retry-interval",
            "5",
            "--ready-deadline",
            "600",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.manifest_path, PathBuf::from("/tmp/boot-etcd.yaml"));
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.retry_interval, Duration::from_secs(5));
        assert_eq!(config.ready_deadline, Some(Duration::from_secs(600)));
        assert!(config.validate().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_signal_honours_deadline() {
        let stopped =
            tokio::time::timeout(Duration::from_secs(31), stop_signal(Some(Duration::from_secs(30))))
                .await;
        assert!(stopped.is_ok());
    }
}
