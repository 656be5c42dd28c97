//! Zone labeling.

use anyhow::{Context, Result};
use tracing::info;

use rack_client::{label_zones, ClusterApi, LabelOutcome};
use rack_core::Topology;

use crate::config::Config;

/// Label every known cluster node with its rack.
pub async fn run<C: ClusterApi>(
    cluster: &C,
    config: &Config,
    topology: &Topology,
) -> Result<LabelOutcome> {
    let outcome = label_zones(cluster, topology, &config.cluster.zone_label)
        .await
        .context("zone labeling aborted")?;
    info!(
        labelled = outcome.labelled,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "zone labeling finished"
    );
    Ok(outcome)
}
