//! Pods and the services they belong to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::NodeName;

/// Pod phase of a healthy workload.
pub const RUNNING_PHASE: &str = "Running";

/// A point-in-time read of one pod.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodSnapshot {
    /// Pod name.
    pub name: String,
    /// Pod namespace.
    pub namespace: String,
    /// Pod labels.
    pub labels: BTreeMap<String, String>,
    /// Reported phase (`Pending`, `Running`, ...). Empty if unreported.
    pub phase: String,
    /// Node the pod is assigned to, if scheduled.
    pub node_name: Option<NodeName>,
}

impl PodSnapshot {
    /// Create a running pod in the `default` namespace.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            namespace: "default".into(),
            phase: RUNNING_PHASE.into(),
            ..Default::default()
        }
    }

    /// Add a label.
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Assign to a node.
    pub fn on_node(mut self, node: &str) -> Self {
        self.node_name = Some(NodeName::from(node));
        self
    }

    /// Set the phase.
    pub fn with_phase(mut self, phase: &str) -> Self {
        self.phase = phase.into();
        self
    }

    /// Whether the pod is in the `Running` phase.
    pub fn is_running(&self) -> bool {
        self.phase == RUNNING_PHASE
    }

    /// Whether the pod matches an equality-based label selector
    /// (`k1=v1,k2=v2`). An empty selector matches everything.
    pub fn matches_selector(&self, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .all(|term| match term.split_once('=') {
                Some((key, value)) => {
                    self.labels.get(key.trim()).map(String::as_str) == Some(value.trim())
                }
                None => self.labels.contains_key(term),
            })
    }
}

/// A critical service whose pods are checked for zone spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Service name.
    pub name: String,
    /// Label selector resolving the service's pods.
    pub selector: String,
}

impl ServiceSpec {
    /// A service selected by `<label_key>=<name>`.
    pub fn labelled(label_key: &str, name: &str) -> Self {
        Self {
            name: name.into(),
            selector: format!("{}={}", label_key, name),
        }
    }
}
