//! Failure scenarios, grouped by the component under stress.
//!
//! - `node` - single-node failure and recovery
//! - `rack` - whole-rack failure, partial failure inside a rack
//! - `backend` - probe routing, control-plane idempotence
//! - `health` - service resilience scoring and observation failures
//! - `identity` - orchestrator node resolution from the environment
//!
//! All scenarios run against the in-memory cluster with zero waits.

pub mod backend;
pub mod health;
pub mod identity;
pub mod node;
pub mod rack;
