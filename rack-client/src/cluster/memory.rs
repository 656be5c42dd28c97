//! In-memory cluster for testing.
//!
//! Holds node and pod state behind a shared handle, applies patches the way
//! the API server would, and records every patch for verification. Failures
//! can be injected per node or for the whole listing.

use super::ClusterApi;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rack_types::{ClusterError, NodeName, NodePatch, NodeSnapshot, PodSnapshot};

/// One patch request seen by the in-memory cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    /// Target node.
    pub node: NodeName,
    /// Requested change.
    pub patch: NodePatch,
    /// Whether the request was a dry run.
    pub dry_run: bool,
}

/// In-memory cluster for testing.
///
/// Clones share state, so a test can keep one handle while the code under
/// test owns another.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCluster {
    inner: Arc<Mutex<InMemoryClusterInner>>,
}

#[derive(Debug, Default)]
struct InMemoryClusterInner {
    nodes: BTreeMap<NodeName, NodeSnapshot>,
    pods: Vec<PodSnapshot>,
    patches: Vec<PatchRecord>,
    deny_mutations: bool,
    fail_list_nodes: Option<String>,
    fail_list_pods: Option<String>,
    fail_patch: BTreeSet<NodeName>,
}

impl InMemoryCluster {
    /// Create an empty cluster.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryClusterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a node.
    pub fn add_node(&self, node: NodeSnapshot) {
        let mut inner = self.lock();
        inner.nodes.insert(node.name.clone(), node);
    }

    /// Add a pod.
    pub fn add_pod(&self, pod: PodSnapshot) {
        self.lock().pods.push(pod);
    }

    /// Remove a node, leaving its pods pointing at a missing node.
    pub fn remove_node(&self, name: &str) {
        self.lock().nodes.remove(name);
    }

    /// Current state of a node.
    pub fn node(&self, name: &str) -> Option<NodeSnapshot> {
        self.lock().nodes.get(name).cloned()
    }

    /// Set a node's Ready condition.
    pub fn set_ready(&self, name: &str, ready: bool) {
        if let Some(node) = self.lock().nodes.get_mut(name) {
            node.ready = Some(ready);
        }
    }

    /// Reject every mutation, dry run included, as unauthorized.
    pub fn deny_mutations(&self) {
        self.lock().deny_mutations = true;
    }

    /// Make node listing fail with a transient error until cleared.
    pub fn fail_list_nodes(&self, error: &str) {
        self.lock().fail_list_nodes = Some(error.to_string());
    }

    /// Make pod listing fail with a transient error until cleared.
    pub fn fail_list_pods(&self, error: &str) {
        self.lock().fail_list_pods = Some(error.to_string());
    }

    /// Make every patch of one node fail with a transient error.
    pub fn fail_patches_for(&self, name: &str) {
        self.lock().fail_patch.insert(NodeName::from(name));
    }

    /// Clear injected failures.
    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.deny_mutations = false;
        inner.fail_list_nodes = None;
        inner.fail_list_pods = None;
        inner.fail_patch.clear();
    }

    /// Every patch request received, in order.
    pub fn patches(&self) -> Vec<PatchRecord> {
        self.lock().patches.clone()
    }

    /// Persisting (non dry-run) patch requests received.
    pub fn applied_patches(&self) -> Vec<PatchRecord> {
        self.lock()
            .patches
            .iter()
            .filter(|p| !p.dry_run)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ClusterApi for InMemoryCluster {
    async fn list_nodes(&self) -> Result<Vec<NodeSnapshot>, ClusterError> {
        let inner = self.lock();
        if let Some(error) = &inner.fail_list_nodes {
            return Err(ClusterError::Transient(error.clone()));
        }
        Ok(inner.nodes.values().cloned().collect())
    }

    async fn list_pods(&self, selector: &str) -> Result<Vec<PodSnapshot>, ClusterError> {
        let inner = self.lock();
        if let Some(error) = &inner.fail_list_pods {
            return Err(ClusterError::Transient(error.clone()));
        }
        Ok(inner
            .pods
            .iter()
            .filter(|pod| pod.matches_selector(selector))
            .cloned()
            .collect())
    }

    async fn read_node(&self, name: &str) -> Result<NodeSnapshot, ClusterError> {
        self.lock()
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::node_not_found(name))
    }

    async fn patch_node(
        &self,
        name: &str,
        patch: &NodePatch,
        dry_run: bool,
    ) -> Result<(), ClusterError> {
        let mut inner = self.lock();
        inner.patches.push(PatchRecord {
            node: NodeName::from(name),
            patch: patch.clone(),
            dry_run,
        });

        if inner.deny_mutations {
            return Err(ClusterError::AuthorizationDenied(format!(
                "cannot patch node {}",
                name
            )));
        }
        if inner.fail_patch.contains(name) {
            return Err(ClusterError::Transient(format!("patch of {} failed", name)));
        }

        let node = inner
            .nodes
            .get_mut(name)
            .ok_or_else(|| ClusterError::node_not_found(name))?;
        if dry_run {
            return Ok(());
        }

        if let Some(unschedulable) = patch.unschedulable {
            node.unschedulable = unschedulable;
        }
        if let Some(taints) = &patch.taints {
            node.taints = taints.clone();
        }
        if let Some(labels) = &patch.labels {
            node.labels
                .extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(())
    }
}
