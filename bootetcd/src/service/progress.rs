//! Progress reporting
//!
//! The waiter reports every failed probe through a `ProgressReporter`. The
//! binary logs them with tracing; embedding callers can collect them from a
//! channel instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// One failed readiness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    /// 1-based number of the failed attempt
    pub attempt: u32,
    /// Failure cause, including its source chain
    pub error: String,
    /// Pause before the next attempt
    pub retry_in: Duration,
}

/// Receives progress notifications while waiting for etcd
pub trait ProgressReporter: Send + Sync {
    /// Called once per failed probe, before the pause
    fn probe_failed(&self, failure: &ProbeFailure);
}

/// Logs progress through tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn probe_failed(&self, failure: &ProbeFailure) {
        info!(
            attempt = failure.attempt,
            "couldn't talk to etcd server (retrying {:?} later): {}",
            failure.retry_in,
            failure.error
        );
    }
}

impl ProgressReporter for UnboundedSender<ProbeFailure> {
    fn probe_failed(&self, failure: &ProbeFailure) {
        // A dropped receiver only means nobody is listening anymore
        let _ = self.send(failure.clone());
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for Arc<R> {
    fn probe_failed(&self, failure: &ProbeFailure) {
        (**self).probe_failed(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    fn failure(attempt: u32) -> ProbeFailure {
        ProbeFailure {
            attempt,
            error: "connection refused".to_string(),
            retry_in: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_channel_reporter_forwards_failures() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tx.probe_failed(&failure(1));
        tx.probe_failed(&failure(2));

        assert_eq!(rx.try_recv().unwrap(), failure(1));
        assert_eq!(rx.try_recv().unwrap(), failure(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_reporter_ignores_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        tx.probe_failed(&failure(1));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_reporter_logs_failure() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let reporter: Arc<dyn ProgressReporter> = Arc::new(TracingReporter);
        tracing::subscriber::with_default(subscriber, || reporter.probe_failed(&failure(3)));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("INFO"));
        assert!(output.contains(
            "couldn't talk to etcd server (retrying 10s later): connection refused"
        ));
        assert!(output.contains("attempt=3"));
    }
}
