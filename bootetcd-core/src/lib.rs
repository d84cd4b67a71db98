//! Bootetcd Core
//!
//! Core types for the etcd bootstrap step.
//!
//! This crate contains:
//! - Domain types: the static Pod descriptor handed to the kubelet
//! - Target: the well-known manifest path and probe endpoint
//! - DTOs: payloads returned by the etcd HTTP API

pub mod domain;
pub mod dto;
pub mod target;
