//! Scenario orchestration.
//!
//! The orchestrator owns the chosen backend, the health evaluator and the
//! topology. It picks targets with rack-core's selection functions, drives
//! [`ScenarioState`] and performs the actions it emits: power calls, waits
//! and health checks.
//!
//! A failing target never aborts a scenario. Power-on is attempted for every
//! target even if its power-off failed, so the cluster is not left
//! half-failed.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

use rack_core::{
    select_node, select_zone, Action, CheckPoint, Delay, Event, HealthReport, ScenarioKind,
    ScenarioState, SelectionError, Topology,
};
use rack_types::{NodeName, ZoneId};

use crate::backend::FailureBackend;
use crate::cluster::ClusterApi;
use crate::health::HealthEvaluator;

/// Wait intervals for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Pause after each power call.
    pub injection_delay: Duration,
    /// Settle time before a health check.
    pub stabilization: Duration,
    /// Time targets stay down after the first check.
    pub downtime: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            injection_delay: Duration::from_secs(5),
            stabilization: Duration::from_secs(60),
            downtime: Duration::from_secs(10),
        }
    }
}

impl Timings {
    /// No waiting at all.
    pub fn zero() -> Self {
        Self {
            injection_delay: Duration::ZERO,
            stabilization: Duration::ZERO,
            downtime: Duration::ZERO,
        }
    }

    fn of(&self, delay: Delay) -> Duration {
        match delay {
            Delay::Stabilization => self.stabilization,
            Delay::Downtime => self.downtime,
        }
    }
}

/// Which power operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStep {
    /// `power_off`.
    Off,
    /// `power_on`.
    On,
}

impl fmt::Display for PowerStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerStep::Off => write!(f, "power off"),
            PowerStep::On => write!(f, "power on"),
        }
    }
}

/// One failed power call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    /// Target node.
    pub node: NodeName,
    /// Operation that failed.
    pub step: PowerStep,
    /// Error text.
    pub error: String,
}

/// Outcome of one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Zone failed (zone scenario only).
    pub zone: Option<ZoneId>,
    /// Nodes acted on, in order.
    pub targets: Vec<NodeName>,
    /// Zone members left alone because they share the orchestrator's zone.
    pub skipped: Vec<NodeName>,
    /// Power calls that failed.
    pub failures: Vec<TargetFailure>,
    /// Health reports, in checkpoint order.
    pub checks: Vec<(CheckPoint, HealthReport)>,
    /// Final state reached.
    pub state: ScenarioState,
}

impl ScenarioReport {
    fn new(
        kind: ScenarioKind,
        zone: Option<ZoneId>,
        targets: Vec<NodeName>,
        skipped: Vec<NodeName>,
    ) -> Self {
        Self {
            kind,
            zone,
            targets,
            skipped,
            failures: Vec::new(),
            checks: Vec::new(),
            state: ScenarioState::new(),
        }
    }

    /// Health report taken at `checkpoint`.
    pub fn check(&self, checkpoint: CheckPoint) -> Option<&HealthReport> {
        self.checks
            .iter()
            .find(|(cp, _)| *cp == checkpoint)
            .map(|(_, report)| report)
    }

    /// Whether the final health check ran.
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

/// Drives failure scenarios against one cluster through one backend.
pub struct Orchestrator<C, B> {
    evaluator: HealthEvaluator<C>,
    backend: B,
    topology: Topology,
    current: NodeName,
    timings: Timings,
    rng: StdRng,
}

impl<C: ClusterApi, B: FailureBackend> Orchestrator<C, B> {
    /// Create an orchestrator running on `current`.
    pub fn new(
        evaluator: HealthEvaluator<C>,
        backend: B,
        topology: Topology,
        current: NodeName,
        timings: Timings,
    ) -> Self {
        Self {
            evaluator,
            backend,
            topology,
            current,
            timings,
            rng: StdRng::from_entropy(),
        }
    }

    /// Make target selection deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The orchestrator's node.
    pub fn current_node(&self) -> &NodeName {
        &self.current
    }

    /// One full health check.
    pub async fn health_check(&self) -> HealthReport {
        self.evaluator.full_check().await
    }

    /// Fail and recover one random node other than the orchestrator's.
    pub async fn simulate_node(&mut self) -> Result<ScenarioReport, SelectionError> {
        let target = select_node(&self.topology, &self.current, &mut self.rng)?;
        info!(node = %target, backend = %self.backend.kind(), "simulating node failure");
        let report = ScenarioReport::new(ScenarioKind::Node, None, vec![target], Vec::new());
        Ok(self.run(report).await)
    }

    /// Fail and recover every node of one random zone other than the
    /// orchestrator's.
    pub async fn simulate_zone(&mut self) -> Result<ScenarioReport, SelectionError> {
        let plan = select_zone(&self.topology, &self.current, &mut self.rng)?;
        for node in &plan.skipped {
            warn!(node = %node, zone = %plan.zone, "skipping node in the orchestrator's zone");
        }
        info!(
            zone = %plan.zone,
            targets = ?plan.targets,
            backend = %self.backend.kind(),
            "simulating rack failure"
        );
        let report = ScenarioReport::new(
            ScenarioKind::Zone,
            Some(plan.zone),
            plan.targets,
            plan.skipped,
        );
        Ok(self.run(report).await)
    }

    async fn run(&self, mut report: ScenarioReport) -> ScenarioReport {
        let mut state = ScenarioState::new();
        let mut pending = VecDeque::from([Event::Start]);

        while let Some(event) = pending.pop_front() {
            let (next, actions) = state.on_event(event);
            if next != state {
                info!(kind = %report.kind, from = ?state, to = ?next, "scenario transition");
            }
            state = next;
            for action in actions {
                self.execute(action, &mut report).await;
                if let Some(done) = action.completion() {
                    pending.push_back(done);
                }
            }
        }

        report.state = state;
        info!(
            kind = %report.kind,
            state = ?state,
            failures = report.failures.len(),
            "scenario finished"
        );
        report
    }

    async fn execute(&self, action: Action, report: &mut ScenarioReport) {
        match action {
            Action::PowerOffTargets => {
                for node in &report.targets {
                    info!(node = %node, "powering off");
                    if let Err(e) = self.backend.power_off(node).await {
                        error!(node = %node, error = %e, "power off failed");
                        report.failures.push(TargetFailure {
                            node: node.clone(),
                            step: PowerStep::Off,
                            error: e.to_string(),
                        });
                    }
                    tokio::time::sleep(self.timings.injection_delay).await;
                }
            }
            Action::PowerOnTargets => {
                for node in &report.targets {
                    info!(node = %node, "powering on");
                    if let Err(e) = self.backend.power_on(node).await {
                        error!(node = %node, error = %e, "power on failed");
                        report.failures.push(TargetFailure {
                            node: node.clone(),
                            step: PowerStep::On,
                            error: e.to_string(),
                        });
                    }
                    if report.kind == ScenarioKind::Zone {
                        tokio::time::sleep(self.timings.injection_delay).await;
                    }
                }
            }
            Action::Wait(delay) => {
                let duration = self.timings.of(delay);
                info!(?delay, secs = duration.as_secs(), "waiting");
                tokio::time::sleep(duration).await;
            }
            Action::HealthCheck(checkpoint) => {
                info!(%checkpoint, "health check");
                let health = self.evaluator.full_check().await;
                report.checks.push((checkpoint, health));
            }
        }
    }
}
