//! # rack-client
//!
//! Cluster access and scenario orchestration for rack-resiliency.
//!
//! This is the I/O layer: it talks to the cluster, powers nodes off and on,
//! and drives the pure scenario state machine from rack-core.
//!
//! ## Features
//!
//! - **Cluster Abstraction**: `ClusterApi` over kube-rs, or in memory for tests
//! - **Capability Probe**: dry-run cordon decides whether real mutations are allowed
//! - **Failure Backends**: control-plane (cordon + taint), host (SSH + virsh), mock
//! - **Health Evaluation**: node readiness and per-service zone spread
//! - **Orchestrator**: single-node and whole-rack failure scenarios
//!
//! ## Example
//!
//! ```ignore
//! use rack_client::{Backend, HealthEvaluator, KubeCluster, MockBackend, Orchestrator, Timings};
//!
//! let cluster = KubeCluster::try_default().await?;
//! let zone_label = "topology.kubernetes.io/zone";
//! let evaluator = HealthEvaluator::new(cluster.clone(), services, zone_label);
//! let backend = Backend::Mock(MockBackend::new(Duration::from_secs(1)));
//! let mut orchestrator =
//!     Orchestrator::new(evaluator, backend, topology, current, Timings::default());
//!
//! let report = orchestrator.simulate_zone().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod cluster;
pub mod health;
pub mod identity;
pub mod inspect;
pub mod labeling;
pub mod orchestrator;
pub mod probe;
pub mod ssh;

pub use backend::{
    Backend, BackendError, BackendKind, BackendMode, ControlPlaneBackend, FailureBackend,
    HostBackend, HostEntry, HostSettings, MockBackend, MockCall,
};
pub use cluster::{ClusterApi, InMemoryCluster, KubeCluster, PatchRecord};
pub use health::HealthEvaluator;
pub use identity::{current_node, resolve_current_node};
pub use inspect::{render_view, ClusterInspector};
pub use labeling::{label_zones, LabelOutcome};
pub use orchestrator::{Orchestrator, PowerStep, ScenarioReport, TargetFailure, Timings};
pub use probe::can_mutate_nodes;
pub use ssh::{CommandResult, SshError, SshTarget};
