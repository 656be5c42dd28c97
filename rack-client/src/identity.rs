//! Which node is the orchestrator running on?

use sysinfo::System;
use tracing::debug;

use rack_core::Topology;
use rack_types::NodeName;

/// Resolve the orchestrator's node.
///
/// Order: runtime hostname when it is a topology member, then the
/// environment override, then the configured fallback, then the raw
/// hostname.
pub fn current_node(topology: &Topology, env_var: &str, fallback: Option<&str>) -> NodeName {
    let hostname = System::host_name();
    let from_env = std::env::var(env_var).ok();
    let node = resolve_current_node(
        topology,
        hostname.as_deref(),
        from_env.as_deref(),
        fallback,
    );
    debug!(hostname = ?hostname, env = ?from_env, node = %node, "resolved current node");
    node
}

/// Pure resolution step behind [`current_node`].
///
/// Environment and fallback names that match a topology entry, ignoring
/// case, resolve to that entry.
pub fn resolve_current_node(
    topology: &Topology,
    hostname: Option<&str>,
    from_env: Option<&str>,
    fallback: Option<&str>,
) -> NodeName {
    // A name the table knows always comes back in the table's spelling.
    let canonical = |name: &str| {
        let name = name.trim();
        topology
            .lookup_ignore_case(name)
            .map(|(known, _)| known.clone())
            .unwrap_or_else(|| NodeName::from(name))
    };

    if let Some((name, _)) = hostname.and_then(|h| topology.lookup_ignore_case(h.trim())) {
        return name.clone();
    }
    if let Some(name) = from_env.filter(|s| !s.trim().is_empty()) {
        return canonical(name);
    }
    if let Some(name) = fallback.filter(|s| !s.trim().is_empty()) {
        return canonical(name);
    }
    NodeName::from(hostname.unwrap_or("localhost").trim())
}
