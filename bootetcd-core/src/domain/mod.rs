//! Core domain types
//!
//! The declarative workload descriptor written for the kubelet. These types
//! mirror the subset of the Kubernetes Pod schema the bootstrap manifest uses.

pub mod pod;
