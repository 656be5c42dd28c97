//! Assertion helpers for failure scenarios.
//!
//! Pure functions that check a finished scenario or a node snapshot and
//! return pass/fail with details, so a failing scenario says what went wrong.

use rack_client::{PatchRecord, ScenarioReport};
use rack_core::CheckPoint;
use rack_types::{NodeName, NodeSnapshot};

/// Result of an assertion check.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Description of what was checked
    pub description: String,
    /// Details on failure
    pub failure_details: Option<String>,
}

impl AssertionResult {
    /// Create a passing result.
    pub fn pass(description: &str) -> Self {
        Self {
            passed: true,
            description: description.into(),
            failure_details: None,
        }
    }

    /// Create a failing result.
    pub fn fail(description: &str, details: &str) -> Self {
        Self {
            passed: false,
            description: description.into(),
            failure_details: Some(details.into()),
        }
    }
}

/// Assert that the orchestrator's node is neither a target nor was skipped
/// into the target list.
pub fn assert_current_not_targeted(report: &ScenarioReport, current: &NodeName) -> AssertionResult {
    if report.targets.contains(current) {
        return AssertionResult::fail(
            "Orchestrator node excluded from targets",
            &format!("{} found in targets {:?}", current, report.targets),
        );
    }
    AssertionResult::pass(&format!(
        "{} not among {} targets",
        current,
        report.targets.len()
    ))
}

/// Assert that all three health checks ran, in order.
pub fn assert_checks_complete(report: &ScenarioReport) -> AssertionResult {
    let expected = [
        CheckPoint::AfterFailure,
        CheckPoint::BeforeRecovery,
        CheckPoint::Final,
    ];
    let seen: Vec<CheckPoint> = report.checks.iter().map(|(cp, _)| *cp).collect();
    if seen != expected {
        return AssertionResult::fail(
            "All health checks ran",
            &format!("expected {:?}, got {:?}", expected, seen),
        );
    }
    if !report.is_complete() {
        return AssertionResult::fail(
            "All health checks ran",
            &format!("scenario stopped in {:?}", report.state),
        );
    }
    AssertionResult::pass("All health checks ran in order")
}

/// Assert that a node is back in service: schedulable and without the
/// simulated-failure taint.
pub fn assert_node_restored(node: &NodeSnapshot) -> AssertionResult {
    if node.unschedulable {
        return AssertionResult::fail(
            "Node restored",
            &format!("{} is still cordoned", node.name),
        );
    }
    if node.has_simulated_failure() {
        return AssertionResult::fail(
            "Node restored",
            &format!("{} still carries the simulated-failure taint", node.name),
        );
    }
    AssertionResult::pass(&format!("{} restored", node.name))
}

/// Assert that a node is out of service with exactly one simulated-failure
/// taint.
pub fn assert_node_failed_once(node: &NodeSnapshot) -> AssertionResult {
    let count = node
        .taints
        .iter()
        .filter(|t| t.is_simulated_failure())
        .count();
    if !node.unschedulable {
        return AssertionResult::fail(
            "Node failed",
            &format!("{} is schedulable", node.name),
        );
    }
    if count != 1 {
        return AssertionResult::fail(
            "Node failed",
            &format!("{} has {} simulated-failure taints", node.name, count),
        );
    }
    AssertionResult::pass(&format!("{} failed with one taint", node.name))
}

/// Assert that every taint `before` carried, other than the simulated
/// failure, is still present `after`.
pub fn assert_taints_preserved(before: &NodeSnapshot, after: &NodeSnapshot) -> AssertionResult {
    let missing: Vec<&str> = before
        .taints
        .iter()
        .filter(|t| !t.is_simulated_failure())
        .filter(|t| !after.taints.contains(t))
        .map(|t| t.key.as_str())
        .collect();
    if !missing.is_empty() {
        return AssertionResult::fail(
            "Pre-existing taints preserved",
            &format!("{} lost taints {:?}", after.name, missing),
        );
    }
    AssertionResult::pass(&format!("{} kept its taints", after.name))
}

/// Assert that no persisting patch reached the cluster.
pub fn assert_no_applied_patches(patches: &[PatchRecord]) -> AssertionResult {
    match patches.iter().find(|p| !p.dry_run) {
        Some(patch) => AssertionResult::fail(
            "Cluster untouched",
            &format!("patch applied to {}: {:?}", patch.node, patch.patch),
        ),
        None => AssertionResult::pass(&format!(
            "{} patch requests, all dry runs",
            patches.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_types::{NodePatch, Taint, TaintEffect};

    #[test]
    fn test_node_restored_pass() {
        let node = NodeSnapshot::new("worker-w003");
        assert!(assert_node_restored(&node).passed);
    }

    #[test]
    fn test_node_restored_fail_cordoned() {
        let mut node = NodeSnapshot::new("worker-w003");
        node.unschedulable = true;

        let result = assert_node_restored(&node);
        assert!(!result.passed);
        assert!(result.failure_details.unwrap().contains("cordoned"));
    }

    #[test]
    fn test_node_failed_once_fail_duplicate() {
        let mut node = NodeSnapshot::new("worker-w003")
            .with_taint(Taint::simulated_failure())
            .with_taint(Taint::simulated_failure());
        node.unschedulable = true;

        let result = assert_node_failed_once(&node);
        assert!(!result.passed);
        assert!(result.failure_details.unwrap().contains("2 simulated-failure"));
    }

    #[test]
    fn test_taints_preserved_fail() {
        let before = NodeSnapshot::new("worker-w003")
            .with_taint(Taint::new("dedicated", TaintEffect::NoSchedule));
        let after = NodeSnapshot::new("worker-w003");

        let result = assert_taints_preserved(&before, &after);
        assert!(!result.passed);
        assert!(result.failure_details.unwrap().contains("dedicated"));
    }

    #[test]
    fn test_taints_preserved_ignores_simulated_failure() {
        let before = NodeSnapshot::new("worker-w003").with_taint(Taint::simulated_failure());
        let after = NodeSnapshot::new("worker-w003");
        assert!(assert_taints_preserved(&before, &after).passed);
    }

    #[test]
    fn test_no_applied_patches() {
        let dry = PatchRecord {
            node: NodeName::new("worker-w003"),
            patch: NodePatch::cordon(true),
            dry_run: true,
        };
        assert!(assert_no_applied_patches(&[dry.clone()]).passed);

        let applied = PatchRecord {
            dry_run: false,
            ..dry
        };
        assert!(!assert_no_applied_patches(&[applied]).passed);
    }
}
