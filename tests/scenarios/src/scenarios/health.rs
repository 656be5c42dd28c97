//! Health evaluation scenarios.

#[cfg(test)]
mod tests {
    use crate::harness::ScenarioHarness;
    use rack_core::{CheckPoint, ServiceHealth, UnknownZonePolicy};
    use rack_types::{NodeSnapshot, PodSnapshot};

    /// A service without pods is reported and left out of the tally.
    #[tokio::test]
    async fn service_without_pods_is_excluded() {
        let harness = ScenarioHarness::lab()
            .with_service("etcd-sim", &["master-m001", "master-m002"])
            .with_empty_service("redis-sim");

        let report = harness.evaluator().full_check().await;
        let summary = report.summary();

        assert_eq!(report.service("redis-sim"), Some(&ServiceHealth::NoPods));
        assert_eq!(summary.no_pods, 1);
        assert_eq!(summary.resilient, 1);
        assert_eq!(summary.non_resilient, 0);
        assert!(report.is_healthy());
    }

    /// One zone is not resilient; two zones are.
    #[tokio::test]
    async fn resilience_needs_two_zones() {
        let harness = ScenarioHarness::lab()
            .with_service("postgres-sim", &["worker-w001", "worker-w002"])
            .with_service("nginx-sim", &["worker-w001", "worker-w003"]);

        let services = harness.evaluator().check_services().await;

        assert!(!services["postgres-sim"].is_resilient());
        assert!(services["nginx-sim"].is_resilient());
    }

    /// Pods on an unlabelled node count as "unknown" unless told otherwise.
    #[tokio::test]
    async fn unknown_zone_policy() {
        let harness = ScenarioHarness::lab().with_service("auth-sim", &["worker-w001"]);
        harness.cluster().add_node(NodeSnapshot::new("stray"));
        harness.cluster().add_pod(
            PodSnapshot::new("auth-sim-stray")
                .with_label("app", "auth-sim")
                .on_node("stray"),
        );

        let counted = harness.evaluator().check_services().await;
        assert!(counted["auth-sim"].is_resilient());

        let ignored = harness
            .evaluator()
            .with_policy(UnknownZonePolicy::Ignore)
            .check_services()
            .await;
        assert!(!ignored["auth-sim"].is_resilient());
    }

    /// Observation failures land in the report instead of aborting.
    #[tokio::test]
    async fn observation_failures_are_recorded() {
        let harness = ScenarioHarness::lab().with_service("etcd-sim", &["master-m001"]);
        harness.cluster().fail_list_nodes("connection refused");
        harness.cluster().fail_list_pods("connection refused");

        let report = harness.evaluator().full_check().await;

        assert_eq!(report.errors.len(), 1);
        assert!(report.nodes.is_empty());
        assert!(matches!(
            report.service("etcd-sim"),
            Some(ServiceHealth::Unavailable { .. })
        ));
        assert!(!report.is_healthy());
    }

    /// Every checkpoint of a rack scenario carries a full report.
    #[tokio::test]
    async fn scenario_reports_every_checkpoint() {
        let harness =
            ScenarioHarness::lab().with_service("etcd-sim", &["master-m002", "master-m003"]);
        let mut orchestrator = harness.orchestrator(harness.mock());

        let report = orchestrator.simulate_zone().await.unwrap();

        for checkpoint in [
            CheckPoint::AfterFailure,
            CheckPoint::BeforeRecovery,
            CheckPoint::Final,
        ] {
            let check = report.check(checkpoint).unwrap();
            assert_eq!(check.nodes.len(), 9);
            assert!(check.service("etcd-sim").unwrap().is_resilient());
        }
    }
}
