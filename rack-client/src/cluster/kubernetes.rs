//! KubeCluster - ClusterApi over a live Kubernetes API server via kube-rs.

use super::ClusterApi;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use rack_types::{ClusterError, NodeName, NodePatch, NodeSnapshot, PodSnapshot, Taint, TaintEffect};

/// ClusterApi implementation backed by a kube-rs client.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient kubeconfig or in-cluster environment.
    pub async fn try_default() -> Result<Self, ClusterError> {
        let client = Client::try_default()
            .await
            .map_err(|e| ClusterError::Transient(format!("cluster client: {}", e)))?;
        Ok(Self::new(client))
    }

    fn nodes(&self) -> Api<Node> {
        Api::all(self.client.clone())
    }

    fn pods(&self) -> Api<Pod> {
        Api::all(self.client.clone())
    }
}

impl std::fmt::Debug for KubeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCluster").finish_non_exhaustive()
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_nodes(&self) -> Result<Vec<NodeSnapshot>, ClusterError> {
        let nodes = self
            .nodes()
            .list(&ListParams::default())
            .await
            .map_err(|e| map_error(e, "node", "*"))?;
        Ok(nodes.items.into_iter().map(node_snapshot).collect())
    }

    async fn list_pods(&self, selector: &str) -> Result<Vec<PodSnapshot>, ClusterError> {
        let params = if selector.is_empty() {
            ListParams::default()
        } else {
            ListParams::default().labels(selector)
        };
        let pods = self
            .pods()
            .list(&params)
            .await
            .map_err(|e| map_error(e, "pod", selector))?;
        Ok(pods.items.into_iter().map(pod_snapshot).collect())
    }

    async fn read_node(&self, name: &str) -> Result<NodeSnapshot, ClusterError> {
        let node = self
            .nodes()
            .get(name)
            .await
            .map_err(|e| map_error(e, "node", name))?;
        Ok(node_snapshot(node))
    }

    async fn patch_node(
        &self,
        name: &str,
        patch: &NodePatch,
        dry_run: bool,
    ) -> Result<(), ClusterError> {
        let body = patch_body(patch);
        let params = PatchParams {
            dry_run,
            ..Default::default()
        };
        debug!(node = %name, dry_run, patch = %body, "patching node");
        self.nodes()
            .patch(name, &params, &Patch::Merge(&body))
            .await
            .map_err(|e| map_error(e, "node", name))?;
        Ok(())
    }
}

/// Map a kube-rs error onto the cluster error taxonomy.
fn map_error(err: kube::Error, kind: &str, name: &str) -> ClusterError {
    match err {
        kube::Error::Api(ae) if ae.code == 403 => ClusterError::AuthorizationDenied(ae.message),
        kube::Error::Api(ae) if ae.code == 404 => ClusterError::ResourceNotFound {
            kind: kind.into(),
            name: name.into(),
        },
        other => ClusterError::Transient(other.to_string()),
    }
}

fn node_snapshot(node: Node) -> NodeSnapshot {
    let name = node.metadata.name.unwrap_or_default();
    let labels = node.metadata.labels.unwrap_or_default();
    let spec = node.spec.unwrap_or_default();

    let mut taints = Vec::new();
    for taint in spec.taints.unwrap_or_default() {
        match TaintEffect::parse(&taint.effect) {
            Some(effect) => taints.push(Taint {
                key: taint.key,
                value: taint.value,
                effect,
            }),
            None => warn!(
                node = %name,
                key = %taint.key,
                effect = %taint.effect,
                "ignoring taint with unknown effect"
            ),
        }
    }

    let ready = node
        .status
        .and_then(|s| s.conditions)
        .and_then(|conditions| {
            conditions
                .into_iter()
                .find(|c| c.type_ == "Ready")
                .map(|c| c.status == "True")
        });

    NodeSnapshot {
        name: NodeName::from(name),
        labels,
        unschedulable: spec.unschedulable.unwrap_or(false),
        taints,
        ready,
    }
}

fn pod_snapshot(pod: Pod) -> PodSnapshot {
    PodSnapshot {
        name: pod.metadata.name.unwrap_or_default(),
        namespace: pod.metadata.namespace.unwrap_or_default(),
        labels: pod.metadata.labels.unwrap_or_default(),
        phase: pod.status.and_then(|s| s.phase).unwrap_or_default(),
        node_name: pod.spec.and_then(|s| s.node_name).map(NodeName::from),
    }
}

/// JSON merge patch for a node. Lists are replaced wholesale, so `taints`
/// must already carry every taint to keep.
fn patch_body(patch: &NodePatch) -> Value {
    let mut body = json!({});
    if let Some(unschedulable) = patch.unschedulable {
        body["spec"]["unschedulable"] = json!(unschedulable);
    }
    if let Some(taints) = &patch.taints {
        let taints: Vec<Value> = taints
            .iter()
            .map(|t| {
                let mut taint = json!({ "key": t.key, "effect": t.effect.as_str() });
                if let Some(value) = &t.value {
                    taint["value"] = json!(value);
                }
                taint
            })
            .collect();
        body["spec"]["taints"] = Value::Array(taints);
    }
    if let Some(labels) = &patch.labels {
        body["metadata"]["labels"] = json!(labels);
    }
    body
}
