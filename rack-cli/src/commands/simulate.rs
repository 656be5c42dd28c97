//! Node and rack failure simulation.

use anyhow::Result;
use tracing::{info, warn};

use rack_client::{
    can_mutate_nodes, Backend, BackendKind, ClusterApi, ControlPlaneBackend, HealthEvaluator,
    HostBackend, MockBackend, Orchestrator, ScenarioReport,
};
use rack_core::{CheckPoint, ScenarioKind, Topology};
use rack_types::NodeName;

use crate::config::Config;

use super::health::log_report;

/// Pick the backend for this run, probing permissions only when the
/// configured mode asks for it.
pub async fn choose_backend<C: ClusterApi + Clone>(
    cluster: &C,
    config: &Config,
    current: &NodeName,
) -> Backend<C> {
    let mode = config.backend.mode;
    let probe = if mode.needs_probe() {
        Some(can_mutate_nodes(cluster, current).await)
    } else {
        None
    };

    let kind = BackendKind::select(mode, probe);
    info!(?mode, ?probe, backend = %kind, "failure backend selected");
    match kind {
        BackendKind::ControlPlane => {
            Backend::ControlPlane(ControlPlaneBackend::new(cluster.clone(), current.clone()))
        }
        BackendKind::Host => {
            Backend::Host(HostBackend::new(config.backend.host.clone(), current.clone()))
        }
        BackendKind::Mock => Backend::Mock(MockBackend::new(config.timing.mock_delay())),
    }
}

/// Run one scenario to completion.
///
/// Fails only when no safe target exists; per-target power failures are
/// logged and left in the report.
pub async fn run<C: ClusterApi + Clone>(
    cluster: C,
    config: &Config,
    topology: Topology,
    current: NodeName,
    kind: ScenarioKind,
) -> Result<ScenarioReport> {
    let backend = choose_backend(&cluster, config, &current).await;
    let evaluator = HealthEvaluator::new(
        cluster,
        config.services.specs(),
        &config.cluster.zone_label,
    )
    .with_policy(config.health.unknown_zone);

    let mut orchestrator =
        Orchestrator::new(evaluator, backend, topology, current, config.timing.timings());
    if let Some(seed) = config.timing.seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let report = match kind {
        ScenarioKind::Node => orchestrator.simulate_node().await?,
        ScenarioKind::Zone => orchestrator.simulate_zone().await?,
    };

    for failure in &report.failures {
        warn!(node = %failure.node, step = %failure.step, error = %failure.error, "target failed");
    }
    if let Some(last) = report.check(CheckPoint::Final) {
        log_report(last);
    }
    info!(
        kind = %report.kind,
        targets = ?report.targets,
        failures = report.failures.len(),
        complete = report.is_complete(),
        "simulation finished"
    );
    Ok(report)
}
