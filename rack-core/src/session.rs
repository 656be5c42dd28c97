//! Scenario state machine for failure simulations.
//!
//! This module provides a pure, side-effect-free state machine for one
//! failure scenario. The state machine takes events as input and produces a
//! new state plus a list of actions to execute.
//!
//! The actual I/O (power control, waiting, health checks) is performed by
//! rack-client, not by this module. Both scenarios (single node and whole
//! zone) share this machine; they differ only in their target lists.
//!
//! ```text
//! Idle → Failing → Down → HealthChecked1 → Recovering → Restored → HealthChecked2
//! ```

use std::fmt;

/// Which scenario is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// One random node.
    Node,
    /// Every node of one random zone.
    Zone,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Node => write!(f, "node"),
            ScenarioKind::Zone => write!(f, "rack"),
        }
    }
}

/// Scenario state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioState {
    /// Targets chosen, nothing touched yet.
    #[default]
    Idle,
    /// Powering off targets.
    Failing,
    /// Targets down, waiting for the cluster to settle.
    Down,
    /// First post-failure health check done; targets stay down.
    HealthChecked1,
    /// Powering targets back on.
    Recovering,
    /// Targets back, waiting for the cluster to settle.
    Restored,
    /// Final health check done. Terminal.
    HealthChecked2,
}

/// Coarse phase marker of a failure session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No target touched yet.
    NotStarted,
    /// Targets are failed.
    Down,
    /// Recovery in progress.
    Recovering,
    /// Targets recovered.
    Restored,
}

/// Points at which a full health check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPoint {
    /// After injection and stabilization.
    AfterFailure,
    /// At the end of the downtime, before power-on.
    BeforeRecovery,
    /// After recovery and stabilization.
    Final,
}

impl fmt::Display for CheckPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckPoint::AfterFailure => write!(f, "after power off"),
            CheckPoint::BeforeRecovery => write!(f, "before power on"),
            CheckPoint::Final => write!(f, "final"),
        }
    }
}

/// Configured wait intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Lets rescheduling converge before health is assessed.
    Stabilization,
    /// How long targets stay down after the first check.
    Downtime,
}

/// Events fed back by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Begin the scenario.
    Start,
    /// Every target has had its power-off attempted.
    PowerOffCompleted,
    /// A full health check finished.
    HealthChecked,
    /// Every target has had its power-on attempted.
    PowerOnCompleted,
}

/// Actions to be executed by the orchestrator.
///
/// These are instructions, not side effects. The orchestrator interprets
/// these and performs the actual I/O, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Power off every target, one at a time, with the injection delay
    /// after each. A failing target does not stop the others.
    PowerOffTargets,
    /// Sleep for a configured interval.
    Wait(Delay),
    /// Run a full health check.
    HealthCheck(CheckPoint),
    /// Power on every target, attempted even if its power-off failed.
    PowerOnTargets,
}

impl Action {
    /// The event the interpreter feeds back once this action is done.
    pub fn completion(&self) -> Option<Event> {
        match self {
            Action::PowerOffTargets => Some(Event::PowerOffCompleted),
            Action::HealthCheck(_) => Some(Event::HealthChecked),
            Action::PowerOnTargets => Some(Event::PowerOnCompleted),
            Action::Wait(_) => None,
        }
    }
}

impl ScenarioState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. Events that do not apply
    /// to the current state leave it unchanged with no actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            (Self::Idle, Event::Start) => (Self::Failing, vec![Action::PowerOffTargets]),

            (Self::Failing, Event::PowerOffCompleted) => (
                Self::Down,
                vec![
                    Action::Wait(Delay::Stabilization),
                    Action::HealthCheck(CheckPoint::AfterFailure),
                ],
            ),

            (Self::Down, Event::HealthChecked) => (
                Self::HealthChecked1,
                vec![
                    Action::Wait(Delay::Downtime),
                    Action::HealthCheck(CheckPoint::BeforeRecovery),
                ],
            ),

            (Self::HealthChecked1, Event::HealthChecked) => {
                (Self::Recovering, vec![Action::PowerOnTargets])
            }

            (Self::Recovering, Event::PowerOnCompleted) => (
                Self::Restored,
                vec![
                    Action::Wait(Delay::Stabilization),
                    Action::HealthCheck(CheckPoint::Final),
                ],
            ),

            (Self::Restored, Event::HealthChecked) => (Self::HealthChecked2, vec![]),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Coarse phase marker.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::NotStarted,
            Self::Failing | Self::Down | Self::HealthChecked1 => Phase::Down,
            Self::Recovering => Phase::Recovering,
            Self::Restored | Self::HealthChecked2 => Phase::Restored,
        }
    }

    /// Whether the final health check has run.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::HealthChecked2)
    }
}
