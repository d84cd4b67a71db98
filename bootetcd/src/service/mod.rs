//! Service layer
//!
//! The pieces the bootstrap step is assembled from: writing the manifest,
//! probing etcd, and reporting progress while waiting.
//!
//! Probing and reporting are trait-based so the waiter can be driven by test
//! doubles and by callers with their own progress channel.

mod manifest;
mod probe;
mod progress;

pub use manifest::ManifestWriter;
pub use probe::{ProbeResponse, ReadinessProbe, VersionRead};
pub use progress::{ProbeFailure, ProgressReporter, TracingReporter};

#[cfg(test)]
pub(crate) use manifest::testing as manifest_testing;
#[cfg(test)]
pub(crate) use probe::testing;
