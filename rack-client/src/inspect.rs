//! Human-readable cluster view logged at the start of each health check.
//!
//! Display only: nothing here feeds the health report.

use std::collections::BTreeMap;

use rack_types::{ClusterError, NodeSnapshot, PodSnapshot, ServiceSpec, SIMULATED_FAILURE_KEY};

use crate::cluster::ClusterApi;

/// Marker for nodes needing attention.
const WARN_MARK: &str = "!";

/// Renders node, pod and critical-service tables from cluster reads.
#[derive(Debug)]
pub struct ClusterInspector<'a, C> {
    cluster: &'a C,
    zone_label: &'a str,
    services: &'a [ServiceSpec],
}

impl<'a, C: ClusterApi> ClusterInspector<'a, C> {
    /// Create an inspector.
    pub fn new(cluster: &'a C, zone_label: &'a str, services: &'a [ServiceSpec]) -> Self {
        Self {
            cluster,
            zone_label,
            services,
        }
    }

    /// Read the cluster and render the view.
    pub async fn render(&self) -> Result<String, ClusterError> {
        let nodes = self.cluster.list_nodes().await?;
        let pods = self.cluster.list_pods("").await?;
        Ok(render_view(&nodes, &pods, self.zone_label, self.services))
    }
}

fn needs_attention(node: &NodeSnapshot) -> bool {
    !node.is_ready() || node.unschedulable || node.has_simulated_failure()
}

/// Render the view from already-read cluster state.
pub fn render_view(
    nodes: &[NodeSnapshot],
    pods: &[PodSnapshot],
    zone_label: &str,
    services: &[ServiceSpec],
) -> String {
    let mut lines = Vec::new();

    let width = nodes
        .iter()
        .map(|n| n.name.as_str().len())
        .max()
        .unwrap_or(0)
        .max("NODE".len());
    lines.push(format!(
        "  {:<width$}  {:<8}  {:<13}  {:<8}  {:<8}  TAINTS",
        "NODE",
        "STATUS",
        "ROLE",
        "ZONE",
        "CORDONED",
        width = width
    ));
    for node in nodes {
        let mark = if needs_attention(node) { WARN_MARK } else { " " };
        let status = if node.is_ready() { "Ready" } else { "NotReady" };
        let zone = node
            .zone(zone_label)
            .map(|z| z.to_string())
            .unwrap_or_else(|| "-".into());
        let cordoned = if node.unschedulable { "yes" } else { "no" };
        let taints = if node.taints.is_empty() {
            "-".to_string()
        } else {
            node.taints
                .iter()
                .map(|t| t.key.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        lines.push(format!(
            "{} {:<width$}  {:<8}  {:<13}  {:<8}  {:<8}  {}",
            mark,
            node.name.as_str(),
            status,
            node.role(),
            zone,
            cordoned,
            taints,
            width = width
        ));
    }
    lines.push(format!(
        "  ({} = NotReady, cordoned or carrying the {} taint)",
        WARN_MARK, SIMULATED_FAILURE_KEY
    ));

    let mut per_node: BTreeMap<&str, usize> = BTreeMap::new();
    for pod in pods {
        let node = pod
            .node_name
            .as_ref()
            .map(|n| n.as_str())
            .unwrap_or("(unscheduled)");
        *per_node.entry(node).or_default() += 1;
    }
    lines.push("Pods per node:".into());
    for (node, count) in &per_node {
        lines.push(format!("  {}: {}", node, count));
    }

    lines.push("Critical services:".into());
    for service in services {
        let members: Vec<String> = pods
            .iter()
            .filter(|pod| pod.matches_selector(&service.selector))
            .map(|pod| {
                format!(
                    "{} ({} on {})",
                    pod.name,
                    if pod.phase.is_empty() { "Unknown" } else { pod.phase.as_str() },
                    pod.node_name.as_ref().map(|n| n.as_str()).unwrap_or("-")
                )
            })
            .collect();
        if members.is_empty() {
            lines.push(format!("  {}: no pods", service.name));
        } else {
            lines.push(format!("  {}: {}", service.name, members.join(", ")));
        }
    }

    lines.join("\n")
}
