//! Orchestrator node resolution.

#[cfg(test)]
mod tests {
    use crate::assertions::assert_current_not_targeted;
    use crate::harness::ScenarioHarness;
    use rack_client::{current_node, MockCall};
    use rack_core::Topology;
    use serial_test::serial;

    const ENV: &str = "RACK_SIM_SCENARIO_NODE";

    const MIXED_CASE: &[(&str, &str)] = &[
        ("Worker-W003", "R2"),
        ("Worker-W004", "R2"),
        ("Master-M001", "R1"),
    ];

    fn mixed_case_table() -> Topology {
        Topology::from_pairs(MIXED_CASE.iter().copied()).unwrap()
    }

    /// The environment names the node when the hostname is not a member.
    #[test]
    #[serial]
    fn environment_names_the_node() {
        let harness = ScenarioHarness::lab();
        std::env::set_var(ENV, "worker-w005");
        let node = current_node(harness.topology(), ENV, Some("master-m003"));
        std::env::remove_var(ENV);

        assert_eq!(node, "worker-w005");
    }

    /// With the environment unset the fallback is used.
    #[test]
    #[serial]
    fn fallback_when_environment_unset() {
        std::env::remove_var(ENV);

        let node = current_node(&mixed_case_table(), ENV, Some("master-m001"));

        assert_eq!(node, "Master-M001");
    }

    /// A lower-case environment value resolves to the table's spelling.
    #[test]
    #[serial]
    fn environment_value_takes_table_spelling() {
        std::env::set_var(ENV, "worker-w003");
        let node = current_node(&mixed_case_table(), ENV, None);
        std::env::remove_var(ENV);

        assert_eq!(node, "Worker-W003");
    }

    /// A mixed-case table never loses the orchestrator's rack.
    #[tokio::test]
    #[serial]
    async fn mixed_case_table_spares_own_rack() {
        std::env::set_var(ENV, "worker-w003");
        let node = current_node(&mixed_case_table(), ENV, None);
        std::env::remove_var(ENV);

        let harness = ScenarioHarness::new(MIXED_CASE, node.as_str());
        for seed in 0..30 {
            let mock = harness.mock();
            let mut orchestrator = harness.orchestrator(mock.clone()).with_seed(seed);
            let report = orchestrator.simulate_zone().await.unwrap();

            assert_eq!(report.zone.as_ref().map(|z| z.as_str()), Some("R1"));
            let result = assert_current_not_targeted(&report, harness.current());
            assert!(result.passed, "{:?}", result.failure_details);
            assert!(!mock.calls().iter().any(|call| matches!(
                call,
                MockCall::PowerOff(n) | MockCall::PowerOn(n) if n == harness.current()
            )));
        }
    }
}
