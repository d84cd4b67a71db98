//! Data Transfer Objects
//!
//! Payloads exchanged with the bootstrapped etcd instance.

pub mod version;
