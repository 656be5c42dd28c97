//! # rack-core
//!
//! Pure logic for rack-resiliency (no I/O, instant tests).
//!
//! This crate implements target selection, taint arithmetic, health scoring
//! and the scenario state machine without touching the cluster, enabling
//! fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input and seed → same targets)
//! - Easy reasoning about scenario transitions
//!
//! The actual I/O (cluster reads, patches, power control, sleeping) is
//! performed by `rack-client`, which interprets the actions produced by
//! the scenario state machine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod health;
pub mod selection;
pub mod session;
pub mod taints;
pub mod topology;

pub use health::{
    HealthReport, HealthSummary, ServiceHealth, ServiceTally, UnknownZonePolicy, ZoneDistribution,
    MIN_RESILIENT_ZONES,
};
pub use selection::{
    safe_nodes, safe_zones, select_node, select_zone, SelectionError, ZoneTarget,
};
pub use session::{Action, CheckPoint, Delay, Event, Phase, ScenarioKind, ScenarioState};
pub use taints::{with_simulated_failure, without_simulated_failure};
pub use topology::{Topology, TopologyError};
