//! Failure target selection.
//!
//! The node running the orchestrator must never be a target: taking it down
//! aborts the simulation halfway and leaves the cluster half-failed. Node
//! selection excludes that node; zone selection excludes its whole zone and
//! then re-filters the chosen zone's members against it.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use rack_types::{NodeName, ZoneId};

use crate::topology::Topology;

/// No safe target exists. Aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Every known node is the orchestrator's own node.
    #[error("no safe nodes available for simulation (current node {current})")]
    NoSafeNodes {
        /// The orchestrator's node.
        current: NodeName,
    },

    /// Every known zone is the orchestrator's own zone, or the chosen zone
    /// has no members left after filtering.
    #[error(
        "no safe zones available for rack simulation (current node {current} in zone {})",
        .current_zone.as_ref().map(ZoneId::as_str).unwrap_or("unknown")
    )]
    NoSafeZones {
        /// The orchestrator's node.
        current: NodeName,
        /// The orchestrator's zone, if known.
        current_zone: Option<ZoneId>,
    },
}

/// Nodes that may be failed individually: everything but `current`.
pub fn safe_nodes(topology: &Topology, current: &NodeName) -> Vec<NodeName> {
    topology
        .nodes()
        .filter(|node| *node != current)
        .cloned()
        .collect()
}

/// Pick one safe node uniformly at random.
pub fn select_node<R: Rng + ?Sized>(
    topology: &Topology,
    current: &NodeName,
    rng: &mut R,
) -> Result<NodeName, SelectionError> {
    safe_nodes(topology, current)
        .choose(rng)
        .cloned()
        .ok_or_else(|| SelectionError::NoSafeNodes {
            current: current.clone(),
        })
}

/// Zones that may be failed as a whole: everything but `current_zone`.
pub fn safe_zones(topology: &Topology, current_zone: Option<&ZoneId>) -> Vec<ZoneId> {
    topology
        .zones_of()
        .into_keys()
        .filter(|zone| Some(zone) != current_zone)
        .collect()
}

/// The nodes of one zone chosen for a whole-zone failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTarget {
    /// The zone being failed.
    pub zone: ZoneId,
    /// Members to power off, in zone order.
    pub targets: Vec<NodeName>,
    /// Members dropped because they share the orchestrator's zone (or are
    /// the orchestrator's node).
    pub skipped: Vec<NodeName>,
}

impl ZoneTarget {
    /// Filter a zone's member list against the orchestrator's location.
    ///
    /// `members` comes from the zone grouping; each member's zone is looked
    /// up again so that a stale grouping cannot smuggle in a node from the
    /// orchestrator's own zone.
    pub fn plan(
        zone: ZoneId,
        members: Vec<NodeName>,
        topology: &Topology,
        current: &NodeName,
    ) -> Self {
        let current_zone = topology.zone_of(current.as_str());
        let (targets, skipped): (Vec<NodeName>, Vec<NodeName>) =
            members.into_iter().partition(|node| {
                node != current
                    && match current_zone {
                        Some(own) => topology.zone_of(node.as_str()) != Some(own),
                        None => true,
                    }
            });
        Self {
            zone,
            targets,
            skipped,
        }
    }
}

/// Pick one safe zone uniformly at random and plan its failure.
pub fn select_zone<R: Rng + ?Sized>(
    topology: &Topology,
    current: &NodeName,
    rng: &mut R,
) -> Result<ZoneTarget, SelectionError> {
    let current_zone = topology.zone_of(current.as_str()).cloned();
    let no_safe_zone = || SelectionError::NoSafeZones {
        current: current.clone(),
        current_zone: current_zone.clone(),
    };

    let zone = safe_zones(topology, current_zone.as_ref())
        .choose(rng)
        .cloned()
        .ok_or_else(no_safe_zone)?;

    let members = topology.zones_of().remove(&zone).unwrap_or_default();
    let target = ZoneTarget::plan(zone, members, topology, current);
    if target.targets.is_empty() {
        return Err(no_safe_zone());
    }
    Ok(target)
}
