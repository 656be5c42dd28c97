//! Single-node failure scenarios.

#[cfg(test)]
mod tests {
    use crate::assertions::{
        assert_checks_complete, assert_current_not_targeted, assert_node_restored,
    };
    use crate::harness::ScenarioHarness;
    use rack_client::MockCall;
    use rack_core::{CheckPoint, SelectionError};

    /// The orchestrator's node is never picked, whatever the seed.
    #[tokio::test]
    async fn own_node_never_targeted() {
        let harness = ScenarioHarness::new(&[("n1", "R1"), ("n2", "R1"), ("n3", "R2")], "n1");

        for seed in 0..50 {
            let mock = harness.mock();
            let mut orchestrator = harness.orchestrator(mock.clone()).with_seed(seed);
            let report = orchestrator.simulate_node().await.unwrap();

            let result = assert_current_not_targeted(&report, harness.current());
            assert!(result.passed, "{:?}", result.failure_details);
            assert!(!mock.calls().iter().any(|call| matches!(
                call,
                MockCall::PowerOff(n) | MockCall::PowerOn(n) if n == harness.current()
            )));
        }
    }

    /// Control-plane node scenario fails one node and brings it back.
    #[tokio::test]
    async fn control_plane_node_scenario_round_trip() {
        let harness =
            ScenarioHarness::lab().with_service("etcd-sim", &["master-m001", "master-m002"]);
        let mut orchestrator = harness.orchestrator(harness.control_plane());

        let report = orchestrator.simulate_node().await.unwrap();

        assert_eq!(report.targets.len(), 1);
        assert!(report.failures.is_empty());
        assert!(assert_checks_complete(&report).passed);
        let target = harness.node(report.targets[0].as_str());
        assert!(assert_node_restored(&target).passed);
        assert!(report.check(CheckPoint::Final).is_some());
    }

    /// Power calls hit the target off then on, once each.
    #[tokio::test]
    async fn mock_node_scenario_call_order() {
        let harness = ScenarioHarness::lab();
        let mock = harness.mock();
        let mut orchestrator = harness.orchestrator(mock.clone());

        let report = orchestrator.simulate_node().await.unwrap();
        let target = report.targets[0].clone();

        assert_eq!(
            mock.calls(),
            vec![MockCall::PowerOff(target.clone()), MockCall::PowerOn(target)]
        );
    }

    /// A topology holding only the orchestrator's node aborts the run.
    #[tokio::test]
    async fn lone_node_aborts() {
        let harness = ScenarioHarness::new(&[("n1", "R1")], "n1");
        let mock = harness.mock();
        let mut orchestrator = harness.orchestrator(mock.clone());

        let err = orchestrator.simulate_node().await.unwrap_err();
        assert!(matches!(err, SelectionError::NoSafeNodes { .. }));
        assert!(mock.calls().is_empty());
    }
}
