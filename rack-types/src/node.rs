//! Node state as read from the cluster, and the mutations applied to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{NodeName, ZoneId};

/// Taint key marking a node as failed by a simulation.
pub const SIMULATED_FAILURE_KEY: &str = "simulated-failure";

/// Label marking a control-plane node.
pub const CONTROL_PLANE_ROLE_LABEL: &str = "node-role.kubernetes.io/control-plane";

/// Effect of a taint on scheduled work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaintEffect {
    /// New work is not scheduled onto the node.
    NoSchedule,
    /// The scheduler tries to avoid the node.
    PreferNoSchedule,
    /// Running work without a toleration is evicted ("hard-evict").
    NoExecute,
}

impl TaintEffect {
    /// The effect as the cluster API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaintEffect::NoSchedule => "NoSchedule",
            TaintEffect::PreferNoSchedule => "PreferNoSchedule",
            TaintEffect::NoExecute => "NoExecute",
        }
    }

    /// Parse the cluster API spelling.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NoSchedule" => Some(TaintEffect::NoSchedule),
            "PreferNoSchedule" => Some(TaintEffect::PreferNoSchedule),
            "NoExecute" => Some(TaintEffect::NoExecute),
            _ => None,
        }
    }
}

impl fmt::Display for TaintEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key/effect marker on a node that repels or evicts work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Taint {
    /// Taint key.
    pub key: String,
    /// Optional taint value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Taint effect.
    pub effect: TaintEffect,
}

impl Taint {
    /// Create a taint without a value.
    pub fn new(key: &str, effect: TaintEffect) -> Self {
        Self {
            key: key.into(),
            value: None,
            effect,
        }
    }

    /// The hard-evict taint applied by a simulated failure.
    pub fn simulated_failure() -> Self {
        Self {
            key: SIMULATED_FAILURE_KEY.into(),
            value: Some("true".into()),
            effect: TaintEffect::NoExecute,
        }
    }

    /// Whether this is the simulated-failure hard-evict taint.
    pub fn is_simulated_failure(&self) -> bool {
        self.key == SIMULATED_FAILURE_KEY && self.effect == TaintEffect::NoExecute
    }

    /// Set the taint value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A point-in-time read of one node.
///
/// Snapshots are never cached across calls: mutations always start from a
/// fresh read so that taints added by someone else are not overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSnapshot {
    /// Node name.
    pub name: NodeName,
    /// Node labels.
    pub labels: BTreeMap<String, String>,
    /// Whether the node is cordoned.
    pub unschedulable: bool,
    /// Current taint set, in cluster order.
    pub taints: Vec<Taint>,
    /// Value of the `Ready` condition; `None` when the node reports no such condition.
    pub ready: Option<bool>,
}

impl NodeSnapshot {
    /// Create a ready, schedulable node with no labels or taints.
    pub fn new(name: &str) -> Self {
        Self {
            name: NodeName::from(name),
            ready: Some(true),
            ..Default::default()
        }
    }

    /// Add a label.
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add a taint.
    pub fn with_taint(mut self, taint: Taint) -> Self {
        self.taints.push(taint);
        self
    }

    /// Set the Ready condition.
    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = Some(ready);
        self
    }

    /// The node is ready only when it reports a true `Ready` condition.
    pub fn is_ready(&self) -> bool {
        self.ready == Some(true)
    }

    /// Zone read from the given label key.
    pub fn zone(&self, zone_label: &str) -> Option<ZoneId> {
        self.labels.get(zone_label).map(|z| ZoneId::from(z.as_str()))
    }

    /// Whether the node carries the simulated-failure taint.
    pub fn has_simulated_failure(&self) -> bool {
        self.taints.iter().any(Taint::is_simulated_failure)
    }

    /// Role derived from `node-role.kubernetes.io/*` labels.
    pub fn role(&self) -> &'static str {
        if self.labels.contains_key(CONTROL_PLANE_ROLE_LABEL) {
            "control-plane"
        } else {
            "worker"
        }
    }
}

/// A partial update of a node's spec and labels.
///
/// `None` fields are left untouched. `taints` replaces the whole list, so
/// callers must build it from a fresh [`NodeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePatch {
    /// New cordon state.
    pub unschedulable: Option<bool>,
    /// Replacement taint list.
    pub taints: Option<Vec<Taint>>,
    /// Labels to set (merged into existing labels).
    pub labels: Option<BTreeMap<String, String>>,
}

impl NodePatch {
    /// Patch that sets the cordon state.
    pub fn cordon(unschedulable: bool) -> Self {
        Self {
            unschedulable: Some(unschedulable),
            ..Default::default()
        }
    }

    /// Patch that replaces the taint list.
    pub fn taints(taints: Vec<Taint>) -> Self {
        Self {
            taints: Some(taints),
            ..Default::default()
        }
    }

    /// Patch that sets one label.
    pub fn label(key: &str, value: &str) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(key.to_string(), value.to_string());
        Self {
            labels: Some(labels),
            ..Default::default()
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.unschedulable.is_none() && self.taints.is_none() && self.labels.is_none()
    }
}
