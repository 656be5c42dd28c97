//! Capability probe: can this process mutate nodes?
//!
//! Runs a dry-run cordon against a node other than the orchestrator's own.
//! Nothing is persisted. The answer picks the failure backend for the whole
//! run.

use tracing::{info, warn};

use rack_types::{ClusterError, NodeName, NodePatch};

use crate::cluster::ClusterApi;

/// Whether node mutations are authorized.
///
/// Returns `false` on authorization failure and on any other failure (with
/// the reason logged). Never errors.
pub async fn can_mutate_nodes<C: ClusterApi + ?Sized>(cluster: &C, current: &NodeName) -> bool {
    let nodes = match cluster.list_nodes().await {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!(error = %e, "capability probe could not list nodes");
            return false;
        }
    };

    let Some(target) = nodes
        .iter()
        .find(|node| node.name != *current)
        .or_else(|| nodes.first())
    else {
        warn!("capability probe found no nodes");
        return false;
    };

    match cluster
        .patch_node(target.name.as_str(), &NodePatch::cordon(true), true)
        .await
    {
        Ok(()) => {
            info!(node = %target.name, "node mutation permitted");
            true
        }
        Err(ClusterError::AuthorizationDenied(reason)) => {
            info!(node = %target.name, %reason, "node mutation not permitted");
            false
        }
        Err(e) => {
            warn!(node = %target.name, error = %e, "capability probe failed");
            false
        }
    }
}
