//! Health scoring: node readiness and per-service zone spread.
//!
//! A service is zone-resilient when its pods span at least two zone buckets.
//! Pods whose node zone cannot be resolved land in the `unknown` bucket;
//! [`UnknownZonePolicy`] decides whether that bucket counts as a zone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use rack_types::{NodeName, ZoneId};

/// Minimum number of distinct zones for a service to be resilient.
pub const MIN_RESILIENT_ZONES: usize = 2;

/// Whether the `unknown` bucket counts towards zone spread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownZonePolicy {
    /// `unknown` is a distinct zone. A single-zone service with an
    /// unresolvable pod is scored resilient.
    #[default]
    Count,
    /// `unknown` pods are tallied but never add a zone.
    Ignore,
}

/// Pod count per zone for one service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneDistribution(BTreeMap<ZoneId, usize>);

impl ZoneDistribution {
    /// Count one pod in `zone`.
    pub fn add(&mut self, zone: ZoneId) {
        *self.0.entry(zone).or_default() += 1;
    }

    /// Pods in `zone`.
    pub fn count(&self, zone: &str) -> usize {
        self.0.get(zone).copied().unwrap_or(0)
    }

    /// Total pods tallied.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of distinct zones, per policy.
    pub fn spread(&self, policy: UnknownZonePolicy) -> usize {
        match policy {
            UnknownZonePolicy::Count => self.0.len(),
            UnknownZonePolicy::Ignore => self.0.keys().filter(|z| !z.is_unknown()).count(),
        }
    }

    /// Pods in the unknown bucket.
    pub fn unknown(&self) -> usize {
        self.0
            .iter()
            .filter(|(zone, _)| zone.is_unknown())
            .map(|(_, count)| *count)
            .sum()
    }

    /// Iterate `(zone, count)` in zone order.
    pub fn iter(&self) -> impl Iterator<Item = (&ZoneId, usize)> {
        self.0.iter().map(|(zone, count)| (zone, *count))
    }
}

impl fmt::Display for ZoneDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (zone, count)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", zone, count)?;
        }
        f.write_str("}")
    }
}

/// Outcome of checking one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceHealth {
    /// The selector matched no pods. Excluded from the resilience tally.
    NoPods,
    /// Pods could not be listed.
    Unavailable {
        /// Error text from the cluster.
        error: String,
    },
    /// Pods were found and scored.
    Scored {
        /// Pods per zone.
        distribution: ZoneDistribution,
        /// Names of pods not in the `Running` phase.
        not_running: Vec<String>,
        /// Whether the spread reaches [`MIN_RESILIENT_ZONES`].
        resilient: bool,
    },
}

impl ServiceHealth {
    /// Whether this service was scored resilient.
    pub fn is_resilient(&self) -> bool {
        matches!(self, ServiceHealth::Scored { resilient: true, .. })
    }
}

/// Accumulates one service's pods before scoring.
#[derive(Debug, Clone, Default)]
pub struct ServiceTally {
    distribution: ZoneDistribution,
    not_running: Vec<String>,
}

impl ServiceTally {
    /// Start an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pod.
    pub fn record(&mut self, pod: &str, zone: ZoneId, running: bool) {
        self.distribution.add(zone);
        if !running {
            self.not_running.push(pod.to_string());
        }
    }

    /// Score the tally.
    pub fn finish(self, policy: UnknownZonePolicy) -> ServiceHealth {
        if self.distribution.total() == 0 {
            return ServiceHealth::NoPods;
        }
        let resilient = self.distribution.spread(policy) >= MIN_RESILIENT_ZONES;
        ServiceHealth::Scored {
            distribution: self.distribution,
            not_running: self.not_running,
            resilient,
        }
    }
}

/// Counts over one [`HealthReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthSummary {
    /// Nodes reporting Ready.
    pub nodes_ready: usize,
    /// Nodes checked.
    pub nodes_total: usize,
    /// Services spanning enough zones.
    pub resilient: usize,
    /// Services confined to fewer zones.
    pub non_resilient: usize,
    /// Services without pods.
    pub no_pods: usize,
    /// Services whose pods could not be listed.
    pub unavailable: usize,
}

impl fmt::Display for HealthSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes ready {}/{}, services resilient {}, non-resilient {}, no pods {}, unavailable {}",
            self.nodes_ready,
            self.nodes_total,
            self.resilient,
            self.non_resilient,
            self.no_pods,
            self.unavailable
        )
    }
}

/// Snapshot of cluster health at one point of a run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Node → Ready.
    pub nodes: BTreeMap<NodeName, bool>,
    /// Service → outcome.
    pub services: BTreeMap<String, ServiceHealth>,
    /// Observation failures (e.g. node listing failed).
    pub errors: Vec<String>,
}

impl HealthReport {
    /// Nodes that are not Ready.
    pub fn not_ready_nodes(&self) -> Vec<&NodeName> {
        self.nodes
            .iter()
            .filter(|(_, ready)| !**ready)
            .map(|(node, _)| node)
            .collect()
    }

    /// Outcome for one service.
    pub fn service(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }

    /// Tally the report.
    pub fn summary(&self) -> HealthSummary {
        let mut summary = HealthSummary {
            nodes_total: self.nodes.len(),
            nodes_ready: self.nodes.values().filter(|ready| **ready).count(),
            ..Default::default()
        };
        for health in self.services.values() {
            match health {
                ServiceHealth::NoPods => summary.no_pods += 1,
                ServiceHealth::Unavailable { .. } => summary.unavailable += 1,
                ServiceHealth::Scored { resilient: true, .. } => summary.resilient += 1,
                ServiceHealth::Scored { resilient: false, .. } => summary.non_resilient += 1,
            }
        }
        summary
    }

    /// Every node Ready, every scored service resilient, no observation errors.
    pub fn is_healthy(&self) -> bool {
        let summary = self.summary();
        self.errors.is_empty()
            && summary.nodes_ready == summary.nodes_total
            && summary.non_resilient == 0
            && summary.unavailable == 0
    }
}
