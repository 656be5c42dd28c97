//! Backend routing and control-plane backend behaviour.

#[cfg(test)]
mod tests {
    use crate::assertions::{
        assert_checks_complete, assert_no_applied_patches, assert_node_failed_once,
        assert_node_restored, assert_taints_preserved,
    };
    use crate::harness::{ScenarioHarness, ZONE_LABEL};
    use rack_client::{Backend, BackendError, BackendKind, FailureBackend, MockCall};
    use rack_types::{NodeName, NodeSnapshot, Taint, TaintEffect};

    /// A denied probe sends every power call of the run to the mock.
    #[tokio::test]
    async fn denied_probe_routes_everything_to_mock() {
        let harness = ScenarioHarness::lab();
        harness.cluster().deny_mutations();

        let backend = harness.auto_backend().await;
        assert_eq!(backend.kind(), BackendKind::Mock);

        let mut orchestrator = harness.orchestrator(backend);
        let node_report = orchestrator.simulate_node().await.unwrap();
        let rack_report = orchestrator.simulate_zone().await.unwrap();
        assert!(assert_checks_complete(&node_report).passed);
        assert!(assert_checks_complete(&rack_report).passed);

        let result = assert_no_applied_patches(&harness.cluster().patches());
        assert!(result.passed, "{:?}", result.failure_details);

        let Backend::Mock(mock) = orchestrator.backend() else {
            panic!("expected mock backend");
        };
        let offs = mock
            .calls()
            .iter()
            .filter(|call| matches!(call, MockCall::PowerOff(_)))
            .count();
        assert_eq!(offs, 1 + rack_report.targets.len());
        assert_eq!(mock.calls().len(), 2 * offs);
    }

    /// A permitted probe picks the control plane and persists nothing.
    #[tokio::test]
    async fn permitted_probe_is_a_dry_run() {
        let harness = ScenarioHarness::lab();

        let backend = harness.auto_backend().await;
        assert_eq!(backend.kind(), BackendKind::ControlPlane);

        let patches = harness.cluster().patches();
        assert_eq!(patches.len(), 1);
        assert!(patches[0].dry_run);
        assert_ne!(patches[0].node, *harness.current());
        assert!(assert_no_applied_patches(&patches).passed);
    }

    /// Powering off twice leaves one failure taint; foreign taints survive
    /// both directions.
    #[tokio::test]
    async fn power_off_is_idempotent_and_preserves_taints() {
        let harness = ScenarioHarness::lab();
        let gpu = Taint::new("nvidia.com/gpu", TaintEffect::NoSchedule).with_value("present");
        harness.cluster().add_node(
            NodeSnapshot::new("worker-w004")
                .with_label(ZONE_LABEL, "R2")
                .with_taint(gpu.clone()),
        );
        let node = NodeName::new("worker-w004");
        let before = harness.node("worker-w004");
        let backend = harness.control_plane();

        backend.power_off(&node).await.unwrap();
        backend.power_off(&node).await.unwrap();

        let failed = harness.node("worker-w004");
        assert!(assert_node_failed_once(&failed).passed);
        assert!(assert_taints_preserved(&before, &failed).passed);

        backend.power_on(&node).await.unwrap();

        let restored = harness.node("worker-w004");
        assert!(assert_node_restored(&restored).passed);
        assert!(assert_taints_preserved(&before, &restored).passed);
        assert_eq!(restored.taints, vec![gpu]);
    }

    /// The control-plane backend will not touch the orchestrator's node.
    #[tokio::test]
    async fn own_node_power_off_refused() {
        let harness = ScenarioHarness::lab();
        let backend = harness.control_plane();

        backend.power_off(harness.current()).await.unwrap();

        assert!(harness.cluster().patches().is_empty());
        assert!(assert_node_restored(&harness.node("master-m001")).passed);
    }

    /// A node missing from the cluster surfaces as not-found.
    #[tokio::test]
    async fn missing_node_is_not_found() {
        let harness = ScenarioHarness::lab();
        harness.cluster().remove_node("worker-w005");
        let backend = harness.control_plane();

        let err = backend
            .power_off(&NodeName::new("worker-w005"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Cluster(ref e) if e.is_not_found()));
    }
}
