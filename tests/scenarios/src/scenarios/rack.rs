//! Whole-rack failure scenarios.

#[cfg(test)]
mod tests {
    use crate::assertions::{
        assert_checks_complete, assert_current_not_targeted, assert_node_restored,
    };
    use crate::harness::ScenarioHarness;
    use rack_client::{MockCall, PowerStep};
    use rack_core::SelectionError;
    use rack_types::NodeName;

    /// With the orchestrator in R1, the only safe rack is R2 and only its
    /// node is touched.
    #[tokio::test]
    async fn only_safe_rack_is_selected() {
        let harness = ScenarioHarness::new(&[("n1", "R1"), ("n2", "R1"), ("n3", "R2")], "n1");

        for seed in 0..20 {
            let mock = harness.mock();
            let mut orchestrator = harness.orchestrator(mock.clone()).with_seed(seed);
            let report = orchestrator.simulate_zone().await.unwrap();

            assert_eq!(report.zone.as_ref().map(|z| z.as_str()), Some("R2"));
            assert_eq!(report.targets, vec![NodeName::new("n3")]);
            assert!(mock.calls().iter().all(|call| match call {
                MockCall::PowerOff(n) | MockCall::PowerOn(n) => *n == "n3",
            }));
        }
    }

    /// Same topology through the control plane: only n3 is ever patched.
    #[tokio::test]
    async fn control_plane_patches_only_safe_rack() {
        let harness = ScenarioHarness::new(&[("n1", "R1"), ("n2", "R1"), ("n3", "R2")], "n1");
        let mut orchestrator = harness.orchestrator(harness.control_plane());

        let report = orchestrator.simulate_zone().await.unwrap();

        assert!(assert_checks_complete(&report).passed);
        let patches = harness.cluster().applied_patches();
        assert!(!patches.is_empty());
        assert!(patches.iter().all(|p| p.node == "n3"));
        assert!(assert_node_restored(&harness.node("n3")).passed);
    }

    /// Node 2 of 3 failing does not stop nodes 1 and 3 or the final check.
    #[tokio::test]
    async fn partial_failure_does_not_abort() {
        let harness = ScenarioHarness::new(
            &[("n1", "R1"), ("a", "R2"), ("b", "R2"), ("c", "R2")],
            "n1",
        );
        harness.cluster().fail_patches_for("b");
        let mut orchestrator = harness.orchestrator(harness.control_plane());

        let report = orchestrator.simulate_zone().await.unwrap();

        assert_eq!(
            report.targets,
            vec![NodeName::new("a"), NodeName::new("b"), NodeName::new("c")]
        );
        assert!(assert_checks_complete(&report).passed);

        let failed: Vec<(&str, PowerStep)> = report
            .failures
            .iter()
            .map(|f| (f.node.as_str(), f.step))
            .collect();
        assert_eq!(failed, vec![("b", PowerStep::Off), ("b", PowerStep::On)]);

        let cordoned: Vec<NodeName> = harness
            .cluster()
            .applied_patches()
            .into_iter()
            .filter(|p| p.patch.unschedulable == Some(true))
            .map(|p| p.node)
            .collect();
        assert_eq!(
            cordoned,
            vec![NodeName::new("a"), NodeName::new("b"), NodeName::new("c")]
        );

        assert!(assert_node_restored(&harness.node("a")).passed);
        assert!(assert_node_restored(&harness.node("c")).passed);
    }

    /// The lab never loses the orchestrator's rack.
    #[tokio::test]
    async fn lab_rack_scenario_spares_own_rack() {
        let harness = ScenarioHarness::lab();

        for seed in 0..20 {
            let mock = harness.mock();
            let mut orchestrator = harness.orchestrator(mock).with_seed(seed);
            let report = orchestrator.simulate_zone().await.unwrap();

            assert_ne!(report.zone.as_ref().map(|z| z.as_str()), Some("R1"));
            assert_eq!(report.targets.len(), 3);
            assert!(report.skipped.is_empty());
            assert!(assert_current_not_targeted(&report, harness.current()).passed);
        }
    }

    /// Every rack is the orchestrator's: nothing to fail.
    #[tokio::test]
    async fn single_rack_aborts() {
        let harness = ScenarioHarness::new(&[("n1", "R1"), ("n2", "R1")], "n1");
        let mut orchestrator = harness.orchestrator(harness.mock());

        let err = orchestrator.simulate_zone().await.unwrap_err();
        assert!(matches!(err, SelectionError::NoSafeZones { .. }));
    }
}
