//! # rack-types
//!
//! Cluster data model shared by every rack-resiliency crate.
//!
//! This crate provides the foundational types used across the workspace:
//! - [`NodeName`], [`ZoneId`] - Identity types for nodes and failure domains
//! - [`Taint`], [`TaintEffect`], [`NodeSnapshot`], [`NodePatch`] - Node state and mutations
//! - [`PodSnapshot`], [`ServiceSpec`] - Workload placement
//! - [`ClusterError`] - Error taxonomy for cluster API calls

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod node;
mod pod;

pub use error::ClusterError;
pub use ids::{NodeName, ZoneId, UNKNOWN_ZONE};
pub use node::{
    NodePatch, NodeSnapshot, Taint, TaintEffect, CONTROL_PLANE_ROLE_LABEL, SIMULATED_FAILURE_KEY,
};
pub use pod::{PodSnapshot, ServiceSpec, RUNNING_PHASE};
