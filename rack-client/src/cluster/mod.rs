//! Cluster API abstraction.
//!
//! The orchestrator only needs four operations from the cluster: list nodes,
//! list pods by label selector, read one node, and patch one node. Keeping
//! them behind [`ClusterApi`] lets every backend, evaluator and scenario run
//! against [`InMemoryCluster`] in tests.
//!
//! # Example
//!
//! ```ignore
//! let cluster = KubeCluster::try_default().await?;
//! let node = cluster.read_node("worker-w003").await?;
//! cluster.patch_node("worker-w003", &NodePatch::cordon(true), false).await?;
//! ```

mod kubernetes;
mod memory;

pub use kubernetes::KubeCluster;
pub use memory::{InMemoryCluster, PatchRecord};

use async_trait::async_trait;
use rack_types::{ClusterError, NodePatch, NodeSnapshot, PodSnapshot};

/// Cluster operations consumed by the orchestrator.
///
/// Implementations map their native failures onto [`ClusterError`]:
/// HTTP 403 is `AuthorizationDenied`, HTTP 404 is `ResourceNotFound`, and
/// everything else is `Transient`.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every node with labels, taints and readiness.
    async fn list_nodes(&self) -> Result<Vec<NodeSnapshot>, ClusterError>;

    /// List pods across all namespaces matching a label selector.
    async fn list_pods(&self, selector: &str) -> Result<Vec<PodSnapshot>, ClusterError>;

    /// Read one node fresh from the cluster.
    async fn read_node(&self, name: &str) -> Result<NodeSnapshot, ClusterError>;

    /// Apply a patch to one node.
    ///
    /// With `dry_run` the server validates and authorizes the request but
    /// persists nothing.
    async fn patch_node(
        &self,
        name: &str,
        patch: &NodePatch,
        dry_run: bool,
    ) -> Result<(), ClusterError>;
}
