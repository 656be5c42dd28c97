//! Static node → zone topology.
//!
//! The topology is injected as configuration and never changes during a run.
//! Lookups of nodes outside the table return `None`; callers treat that as
//! "not a safe target", never as a fatal error.

use std::collections::BTreeMap;
use thiserror::Error;

use rack_types::{NodeName, ZoneId};

/// Errors building a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The same node is assigned to two zones.
    #[error("node {node} assigned to both {first} and {second}")]
    DuplicateNode {
        /// Node name.
        node: NodeName,
        /// Zone of the first assignment.
        first: ZoneId,
        /// Zone of the conflicting assignment.
        second: ZoneId,
    },

    /// A zone-file line could not be parsed.
    #[error("invalid zone file line {line}: {reason}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },
}

/// Static mapping of node identity to zone identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    /// Entries in insertion order.
    entries: Vec<(NodeName, ZoneId)>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a topology from `(node, zone)` pairs.
    pub fn from_pairs<N, Z, I>(pairs: I) -> Result<Self, TopologyError>
    where
        N: Into<NodeName>,
        Z: Into<ZoneId>,
        I: IntoIterator<Item = (N, Z)>,
    {
        let mut topology = Self::new();
        for (node, zone) in pairs {
            topology.insert(node.into(), zone.into())?;
        }
        Ok(topology)
    }

    /// Parse the zone-file format: one `ZONE: node1, node2, ...` per line.
    ///
    /// Node names are lower-cased; blank lines, `#` comments and lines
    /// without a colon are ignored.
    pub fn parse_zone_file(content: &str) -> Result<Self, TopologyError> {
        let mut topology = Self::new();
        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((zone, nodes)) = line.split_once(':') else {
                continue;
            };
            let zone = zone.trim();
            if zone.is_empty() {
                return Err(TopologyError::InvalidLine {
                    line: index + 1,
                    reason: "empty zone name".into(),
                });
            }
            for node in nodes.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                topology.insert(NodeName::from(node.to_lowercase()), ZoneId::from(zone))?;
            }
        }
        Ok(topology)
    }

    /// Add one node. Re-inserting a node into the same zone is a no-op.
    pub fn insert(&mut self, node: NodeName, zone: ZoneId) -> Result<(), TopologyError> {
        if let Some(existing) = self.zone_of(node.as_str()) {
            if *existing == zone {
                return Ok(());
            }
            return Err(TopologyError::DuplicateNode {
                node,
                first: existing.clone(),
                second: zone,
            });
        }
        self.entries.push((node, zone));
        Ok(())
    }

    /// Merge another topology into this one.
    pub fn merge(&mut self, other: Topology) -> Result<(), TopologyError> {
        for (node, zone) in other.entries {
            self.insert(node, zone)?;
        }
        Ok(())
    }

    /// Zone of a node, or `None` if the node is not in the table.
    pub fn zone_of(&self, node: &str) -> Option<&ZoneId> {
        self.entries
            .iter()
            .find(|(name, _)| name.as_str() == node)
            .map(|(_, zone)| zone)
    }

    /// Case-insensitive lookup, returning the table's spelling of the node.
    pub fn lookup_ignore_case(&self, node: &str) -> Option<(&NodeName, &ZoneId)> {
        self.entries
            .iter()
            .find(|(name, _)| name.matches_ignore_case(node))
            .map(|(name, zone)| (name, zone))
    }

    /// Zone → member nodes, members in table order.
    pub fn zones_of(&self) -> BTreeMap<ZoneId, Vec<NodeName>> {
        let mut zones: BTreeMap<ZoneId, Vec<NodeName>> = BTreeMap::new();
        for (node, zone) in &self.entries {
            zones.entry(zone.clone()).or_default().push(node.clone());
        }
        zones
    }

    /// All nodes, in table order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeName> {
        self.entries.iter().map(|(node, _)| node)
    }

    /// Whether the node is in the table.
    pub fn contains(&self, node: &str) -> bool {
        self.zone_of(node).is_some()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
