//! Scenario harness: an in-memory cluster built from a topology.
//!
//! Each harness owns a fresh [`InMemoryCluster`] whose nodes carry their zone
//! label and report Ready, plus the pods of any services added with
//! [`ScenarioHarness::with_service`]. Orchestrators built from it run with
//! zero timings and a fixed seed.

use rack_client::{
    can_mutate_nodes, Backend, BackendKind, BackendMode, ControlPlaneBackend, FailureBackend,
    HealthEvaluator, InMemoryCluster, MockBackend, Orchestrator, Timings,
};
use rack_core::Topology;
use rack_types::{NodeName, NodeSnapshot, PodSnapshot, ServiceSpec};
use std::time::Duration;

/// Zone label used by every harness cluster.
pub const ZONE_LABEL: &str = "topology.kubernetes.io/zone";

/// Label key selecting a service's pods.
pub const APP_LABEL: &str = "app";

/// Seed for target selection.
pub const SEED: u64 = 42;

/// The 9-node, 3-rack lab.
pub const LAB: &[(&str, &str)] = &[
    ("master-m001", "R1"),
    ("worker-w001", "R1"),
    ("worker-w002", "R1"),
    ("master-m002", "R2"),
    ("worker-w003", "R2"),
    ("worker-w004", "R2"),
    ("master-m003", "R3"),
    ("worker-w005", "R3"),
    ("worker-w006", "R3"),
];

/// In-memory cluster plus the orchestrator's view of it.
pub struct ScenarioHarness {
    cluster: InMemoryCluster,
    topology: Topology,
    current: NodeName,
    services: Vec<ServiceSpec>,
}

impl ScenarioHarness {
    /// Build a cluster with one Ready, zone-labelled node per topology entry.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` assigns a node to two zones.
    pub fn new(nodes: &[(&str, &str)], current: &str) -> Self {
        let topology = Topology::from_pairs(nodes.iter().copied())
            .expect("harness topology must be consistent");
        let cluster = InMemoryCluster::new();
        for (node, zone) in nodes {
            cluster.add_node(
                NodeSnapshot::new(node)
                    .with_label(ZONE_LABEL, zone)
                    .with_ready(true),
            );
        }
        Self {
            cluster,
            topology,
            current: NodeName::new(current),
            services: Vec::new(),
        }
    }

    /// The 9-node lab with the orchestrator on `master-m001`.
    pub fn lab() -> Self {
        Self::new(LAB, "master-m001")
    }

    /// Add a critical service with one Running pod on each of `nodes`.
    pub fn with_service(mut self, name: &str, nodes: &[&str]) -> Self {
        for (i, node) in nodes.iter().enumerate() {
            self.cluster.add_pod(
                PodSnapshot::new(&format!("{name}-{i}"))
                    .with_label(APP_LABEL, name)
                    .on_node(node),
            );
        }
        self.services.push(ServiceSpec::labelled(APP_LABEL, name));
        self
    }

    /// Add a critical service that has no pods.
    pub fn with_empty_service(mut self, name: &str) -> Self {
        self.services.push(ServiceSpec::labelled(APP_LABEL, name));
        self
    }

    /// Shared handle to the cluster.
    pub fn cluster(&self) -> &InMemoryCluster {
        &self.cluster
    }

    /// The topology table.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The orchestrator's node.
    pub fn current(&self) -> &NodeName {
        &self.current
    }

    /// Current snapshot of a node.
    ///
    /// # Panics
    ///
    /// Panics if the node does not exist.
    pub fn node(&self, name: &str) -> NodeSnapshot {
        self.cluster
            .node(name)
            .unwrap_or_else(|| panic!("node {name} not in harness cluster"))
    }

    /// Health evaluator over the harness services.
    pub fn evaluator(&self) -> HealthEvaluator<InMemoryCluster> {
        HealthEvaluator::new(self.cluster.clone(), self.services.clone(), ZONE_LABEL)
    }

    /// Control-plane backend on the harness cluster.
    pub fn control_plane(&self) -> ControlPlaneBackend<InMemoryCluster> {
        ControlPlaneBackend::new(self.cluster.clone(), self.current.clone())
    }

    /// Mock backend without delay.
    pub fn mock(&self) -> MockBackend {
        MockBackend::new(Duration::ZERO)
    }

    /// Orchestrator driving `backend` with zero timings and a fixed seed.
    pub fn orchestrator<B: FailureBackend>(
        &self,
        backend: B,
    ) -> Orchestrator<InMemoryCluster, B> {
        Orchestrator::new(
            self.evaluator(),
            backend,
            self.topology.clone(),
            self.current.clone(),
            Timings::zero(),
        )
        .with_seed(SEED)
    }

    /// Probe permissions once and build the backend auto mode would pick.
    pub async fn auto_backend(&self) -> Backend<InMemoryCluster> {
        let probe = can_mutate_nodes(&self.cluster, &self.current).await;
        match BackendKind::select(BackendMode::Auto, Some(probe)) {
            BackendKind::ControlPlane => Backend::ControlPlane(self.control_plane()),
            BackendKind::Host | BackendKind::Mock => Backend::Mock(self.mock()),
        }
    }
}
