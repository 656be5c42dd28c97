//! One-off health check.

use anyhow::Result;
use tracing::{info, warn};

use rack_client::{ClusterApi, HealthEvaluator};
use rack_core::{HealthReport, ServiceHealth};

use crate::config::Config;

/// Run the health-check command.
///
/// An unhealthy cluster is a finding, not a failure: the command succeeds
/// whatever the report says.
pub async fn run<C: ClusterApi>(cluster: C, config: &Config) -> Result<HealthReport> {
    let evaluator = HealthEvaluator::new(
        cluster,
        config.services.specs(),
        &config.cluster.zone_label,
    )
    .with_policy(config.health.unknown_zone);

    let report = evaluator.full_check().await;
    log_report(&report);
    Ok(report)
}

/// Log a report's findings service by service.
pub fn log_report(report: &HealthReport) {
    for node in report.not_ready_nodes() {
        warn!(node = %node, "not Ready");
    }
    for (service, health) in &report.services {
        match health {
            ServiceHealth::NoPods => warn!(service = %service, "no pods"),
            ServiceHealth::Unavailable { error } => {
                warn!(service = %service, %error, "unavailable")
            }
            ServiceHealth::Scored {
                distribution,
                resilient,
                ..
            } => info!(service = %service, %distribution, resilient, "zone spread"),
        }
    }
    for error in &report.errors {
        warn!(%error, "observation failed");
    }
    info!(summary = %report.summary(), healthy = report.is_healthy(), "health report");
}
