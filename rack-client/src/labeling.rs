//! Apply zone labels to cluster nodes from the topology table.

use tracing::{info, warn};

use rack_core::Topology;
use rack_types::{ClusterError, NodePatch};

use crate::cluster::ClusterApi;

/// Counts from one labeling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelOutcome {
    /// Nodes labelled.
    pub labelled: usize,
    /// Cluster nodes absent from the topology.
    pub skipped: usize,
    /// Nodes whose patch failed.
    pub failed: usize,
}

/// Set `<zone_label>=<zone>` on every cluster node found in the topology.
///
/// Node names match case-insensitively. Authorization failure aborts the
/// pass; any other per-node failure is logged and counted.
pub async fn label_zones<C: ClusterApi + ?Sized>(
    cluster: &C,
    topology: &Topology,
    zone_label: &str,
) -> Result<LabelOutcome, ClusterError> {
    let mut outcome = LabelOutcome::default();
    for node in cluster.list_nodes().await? {
        let Some((_, zone)) = topology.lookup_ignore_case(node.name.as_str()) else {
            info!(node = %node.name, "not in zone table, skipping");
            outcome.skipped += 1;
            continue;
        };

        let patch = NodePatch::label(zone_label, zone.as_str());
        match cluster.patch_node(node.name.as_str(), &patch, false).await {
            Ok(()) => {
                info!(node = %node.name, zone = %zone, "labelled");
                outcome.labelled += 1;
            }
            Err(e @ ClusterError::AuthorizationDenied(_)) => return Err(e),
            Err(e) => {
                warn!(node = %node.name, error = %e, "labeling failed");
                outcome.failed += 1;
            }
        }
    }
    Ok(outcome)
}
