//! Health evaluation against the live cluster.
//!
//! Read-only: a full check never mutates anything, so it may run at any
//! point of a scenario. Observation failures are recorded in the report
//! instead of aborting.

use std::collections::BTreeMap;
use tracing::{info, warn};

use rack_core::{HealthReport, ServiceHealth, ServiceTally, UnknownZonePolicy};
use rack_types::{ClusterError, NodeName, ServiceSpec, ZoneId};

use crate::cluster::ClusterApi;
use crate::inspect::ClusterInspector;

/// Checks node readiness and critical-service zone spread.
#[derive(Debug, Clone)]
pub struct HealthEvaluator<C> {
    cluster: C,
    services: Vec<ServiceSpec>,
    zone_label: String,
    policy: UnknownZonePolicy,
}

impl<C: ClusterApi> HealthEvaluator<C> {
    /// Create an evaluator for the given services.
    pub fn new(cluster: C, services: Vec<ServiceSpec>, zone_label: &str) -> Self {
        Self {
            cluster,
            services,
            zone_label: zone_label.to_string(),
            policy: UnknownZonePolicy::default(),
        }
    }

    /// Set how the `unknown` zone bucket is scored.
    pub fn with_policy(mut self, policy: UnknownZonePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The cluster this evaluator reads.
    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    /// Configured services.
    pub fn services(&self) -> &[ServiceSpec] {
        &self.services
    }

    /// Node → Ready. Not-ready nodes are logged, not errors.
    pub async fn check_nodes(&self) -> Result<BTreeMap<NodeName, bool>, ClusterError> {
        let nodes = self.cluster.list_nodes().await?;
        let mut readiness = BTreeMap::new();
        for node in nodes {
            let ready = node.is_ready();
            if !ready {
                warn!(node = %node.name, "node is not Ready");
            }
            readiness.insert(node.name, ready);
        }
        Ok(readiness)
    }

    /// Service → outcome for every configured service.
    pub async fn check_services(&self) -> BTreeMap<String, ServiceHealth> {
        let mut zones = ZoneCache::default();
        let mut results = BTreeMap::new();
        for service in &self.services {
            let health = self.check_service(service, &mut zones).await;
            results.insert(service.name.clone(), health);
        }
        results
    }

    async fn check_service(&self, service: &ServiceSpec, zones: &mut ZoneCache) -> ServiceHealth {
        let pods = match self.cluster.list_pods(&service.selector).await {
            Ok(pods) => pods,
            Err(e) => {
                warn!(service = %service.name, error = %e, "could not list pods");
                return ServiceHealth::Unavailable {
                    error: e.to_string(),
                };
            }
        };

        if pods.is_empty() {
            warn!(service = %service.name, "no pods found");
            return ServiceHealth::NoPods;
        }

        let mut tally = ServiceTally::new();
        for pod in &pods {
            let zone = match &pod.node_name {
                Some(node) => zones.resolve(&self.cluster, node, &self.zone_label).await,
                None => ZoneId::unknown(),
            };
            if !pod.is_running() {
                warn!(
                    service = %service.name,
                    pod = %pod.name,
                    phase = %pod.phase,
                    "pod not Running"
                );
            }
            tally.record(&pod.name, zone, pod.is_running());
        }

        let health = tally.finish(self.policy);
        if let ServiceHealth::Scored {
            distribution,
            resilient,
            ..
        } = &health
        {
            if !resilient {
                warn!(service = %service.name, %distribution, "service not balanced across zones");
            } else if distribution.spread(UnknownZonePolicy::Ignore)
                < rack_core::MIN_RESILIENT_ZONES
            {
                warn!(
                    service = %service.name,
                    %distribution,
                    "service counted resilient only through pods in an unknown zone"
                );
            } else {
                info!(service = %service.name, %distribution, "service spread across zones");
            }
        }
        health
    }

    /// Node check, then service check, combined into one report.
    pub async fn full_check(&self) -> HealthReport {
        info!("=== Health Check Start ===");

        let inspector = ClusterInspector::new(&self.cluster, &self.zone_label, &self.services);
        match inspector.render().await {
            Ok(view) => info!("cluster state:\n{}", view),
            Err(e) => warn!(error = %e, "cluster inspector failed"),
        }

        let mut report = HealthReport::default();
        match self.check_nodes().await {
            Ok(nodes) => report.nodes = nodes,
            Err(e) => {
                warn!(error = %e, "node health check failed");
                report.errors.push(format!("node check: {}", e));
            }
        }
        report.services = self.check_services().await;

        info!(summary = %report.summary(), "=== Health Check End ===");
        report
    }
}

/// Node → zone lookups made during one check.
#[derive(Debug, Default)]
struct ZoneCache(BTreeMap<NodeName, ZoneId>);

impl ZoneCache {
    async fn resolve<C: ClusterApi>(
        &mut self,
        cluster: &C,
        node: &NodeName,
        label: &str,
    ) -> ZoneId {
        if let Some(zone) = self.0.get(node) {
            return zone.clone();
        }
        let zone = match cluster.read_node(node.as_str()).await {
            Ok(snapshot) => snapshot.zone(label).unwrap_or_else(ZoneId::unknown),
            Err(e) => {
                warn!(node = %node, error = %e, "zone lookup failed");
                ZoneId::unknown()
            }
        };
        self.0.insert(node.clone(), zone.clone());
        zone
    }
}
