//! Failure backends: how a node is "powered off" and back on.
//!
//! The orchestrator drives one [`FailureBackend`] chosen at startup. The
//! choice is a pure function of the configured [`BackendMode`] and, in auto
//! mode, the one-time capability probe result:
//!
//! - `ControlPlane`: cordon + hard-evict taint through the cluster API
//! - `Host`: SSH shutdown and hypervisor start of the node's VM
//! - `Mock`: log intent and sleep, never touching anything

mod control_plane;
mod host;
mod mock;

pub use control_plane::ControlPlaneBackend;
pub use host::{HostBackend, HostEntry, HostSettings};
pub use mock::{MockBackend, MockCall};

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use rack_types::{ClusterError, NodeName};

use crate::cluster::ClusterApi;
use crate::ssh::SshError;

/// Errors from a power operation on one node.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The cluster API rejected or failed the request.
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// A shell command failed.
    #[error(transparent)]
    Command(#[from] SshError),

    /// The node has no entry in the host table.
    #[error("no host entry for node {0}")]
    UnknownHost(NodeName),
}

/// Power control for one node at a time.
#[async_trait]
pub trait FailureBackend: Send + Sync {
    /// Take the node out of service.
    async fn power_off(&self, node: &NodeName) -> Result<(), BackendError>;

    /// Return the node to service.
    async fn power_on(&self, node: &NodeName) -> Result<(), BackendError>;

    /// Which variant this is.
    fn kind(&self) -> BackendKind;
}

/// Configured backend mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendMode {
    /// Probe node-mutation permission and pick control-plane or mock.
    #[default]
    Auto,
    /// Always use the cluster API.
    ControlPlane,
    /// Always use SSH + hypervisor.
    Host,
    /// Always simulate.
    Mock,
}

impl BackendMode {
    /// Whether selection needs the capability probe result.
    pub fn needs_probe(&self) -> bool {
        matches!(self, BackendMode::Auto)
    }
}

/// Backend variant in use for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Cordon + taint through the cluster API.
    ControlPlane,
    /// SSH shutdown + hypervisor start.
    Host,
    /// Logged simulation.
    Mock,
}

impl BackendKind {
    /// Pick the backend for a run.
    ///
    /// `probe` is the capability probe result; it is only consulted in auto
    /// mode, where a missing result selects the mock.
    pub fn select(mode: BackendMode, probe: Option<bool>) -> Self {
        match mode {
            BackendMode::Auto => match probe {
                Some(true) => BackendKind::ControlPlane,
                _ => BackendKind::Mock,
            },
            BackendMode::ControlPlane => BackendKind::ControlPlane,
            BackendMode::Host => BackendKind::Host,
            BackendMode::Mock => BackendKind::Mock,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::ControlPlane => write!(f, "control-plane"),
            BackendKind::Host => write!(f, "host"),
            BackendKind::Mock => write!(f, "mock"),
        }
    }
}

/// The backend chosen for a run, as one value the orchestrator owns.
#[derive(Debug)]
pub enum Backend<C> {
    /// Cluster API backend.
    ControlPlane(ControlPlaneBackend<C>),
    /// Host power backend.
    Host(HostBackend),
    /// Simulated backend.
    Mock(MockBackend),
}

#[async_trait]
impl<C: ClusterApi> FailureBackend for Backend<C> {
    async fn power_off(&self, node: &NodeName) -> Result<(), BackendError> {
        match self {
            Backend::ControlPlane(b) => b.power_off(node).await,
            Backend::Host(b) => b.power_off(node).await,
            Backend::Mock(b) => b.power_off(node).await,
        }
    }

    async fn power_on(&self, node: &NodeName) -> Result<(), BackendError> {
        match self {
            Backend::ControlPlane(b) => b.power_on(node).await,
            Backend::Host(b) => b.power_on(node).await,
            Backend::Mock(b) => b.power_on(node).await,
        }
    }

    fn kind(&self) -> BackendKind {
        match self {
            Backend::ControlPlane(_) => BackendKind::ControlPlane,
            Backend::Host(_) => BackendKind::Host,
            Backend::Mock(_) => BackendKind::Mock,
        }
    }
}
