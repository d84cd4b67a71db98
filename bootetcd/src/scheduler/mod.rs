//! Scheduler layer
//!
//! Paces the readiness probes against the bootstrapped etcd member until one
//! succeeds or the caller gives up.

pub mod waiter;

pub use waiter::{Readiness, ReadinessWaiter};
