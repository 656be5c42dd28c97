//! Control-plane backend: cordon plus hard-evict taint.
//!
//! Every operation starts from a fresh read of the node so taints added by
//! anyone else since the last read are carried through the patch.

use async_trait::async_trait;
use tracing::{info, warn};

use rack_core::{with_simulated_failure, without_simulated_failure};
use rack_types::{NodeName, NodePatch, SIMULATED_FAILURE_KEY};

use super::{BackendError, BackendKind, FailureBackend};
use crate::cluster::ClusterApi;

/// Simulates node failure through the cluster API.
#[derive(Debug, Clone)]
pub struct ControlPlaneBackend<C> {
    cluster: C,
    current: NodeName,
}

impl<C: ClusterApi> ControlPlaneBackend<C> {
    /// Create a backend that refuses to touch `current`.
    pub fn new(cluster: C, current: NodeName) -> Self {
        Self { cluster, current }
    }
}

#[async_trait]
impl<C: ClusterApi> FailureBackend for ControlPlaneBackend<C> {
    async fn power_off(&self, node: &NodeName) -> Result<(), BackendError> {
        if *node == self.current {
            warn!(node = %node, "refusing to power off the orchestrator's own node");
            return Ok(());
        }

        let snapshot = self.cluster.read_node(node.as_str()).await?;

        self.cluster
            .patch_node(node.as_str(), &NodePatch::cordon(true), false)
            .await?;
        info!(node = %node, "cordoned");

        match with_simulated_failure(&snapshot.taints) {
            Some(taints) => {
                self.cluster
                    .patch_node(node.as_str(), &NodePatch::taints(taints), false)
                    .await?;
                info!(node = %node, taint = SIMULATED_FAILURE_KEY, "tainted");
            }
            None => info!(node = %node, "already tainted"),
        }
        Ok(())
    }

    async fn power_on(&self, node: &NodeName) -> Result<(), BackendError> {
        let snapshot = self.cluster.read_node(node.as_str()).await?;

        if snapshot.taints.iter().any(|t| t.key == SIMULATED_FAILURE_KEY) {
            let taints = without_simulated_failure(&snapshot.taints);
            self.cluster
                .patch_node(node.as_str(), &NodePatch::taints(taints), false)
                .await?;
            info!(node = %node, taint = SIMULATED_FAILURE_KEY, "taint removed");
        }

        self.cluster
            .patch_node(node.as_str(), &NodePatch::cordon(false), false)
            .await?;
        info!(node = %node, "uncordoned");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::ControlPlane
    }
}
