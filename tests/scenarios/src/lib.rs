//! # scenario-tests
//!
//! End-to-end failure scenarios for rack-resiliency.
//!
//! Every scenario runs against the in-memory cluster, so the suite needs no
//! live cluster, no SSH access and no waiting:
//! - Target selection never touching the orchestrator's node
//! - Control-plane power-off idempotence and taint preservation
//! - Partial failure inside a rack scenario
//! - Backend routing after the capability probe
//! - Service resilience scoring

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assertions;
pub mod harness;

pub mod scenarios;
