//! CLI command implementations.

pub mod health;
pub mod label;
pub mod recover;
pub mod simulate;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Names accepted as the positional action.
pub const ACTIONS: &[&str] = &[
    "health-check",
    "simulate-node",
    "simulate-rack",
    "recover-node",
    "recover-rack",
    "label-zones",
];

/// The positional action did not name a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}' (expected one of: {list})", list = ACTIONS.join(", "))]
pub struct UnknownAction(pub String);

/// A parsed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One full health check.
    HealthCheck,
    /// Fail and recover one random node.
    SimulateNode,
    /// Fail and recover every node of one random rack.
    SimulateRack,
    /// Reserved; does nothing.
    RecoverNode,
    /// Reserved; does nothing.
    RecoverRack,
    /// Label cluster nodes with their rack.
    LabelZones,
}

impl Command {
    /// Whether the command needs a cluster connection.
    pub fn needs_cluster(&self) -> bool {
        !matches!(self, Command::RecoverNode | Command::RecoverRack)
    }
}

impl FromStr for Command {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health-check" => Ok(Command::HealthCheck),
            "simulate-node" => Ok(Command::SimulateNode),
            "simulate-rack" => Ok(Command::SimulateRack),
            "recover-node" => Ok(Command::RecoverNode),
            "recover-rack" => Ok(Command::RecoverRack),
            "label-zones" => Ok(Command::LabelZones),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::HealthCheck => "health-check",
            Command::SimulateNode => "simulate-node",
            Command::SimulateRack => "simulate-rack",
            Command::RecoverNode => "recover-node",
            Command::RecoverRack => "recover-rack",
            Command::LabelZones => "label-zones",
        };
        f.write_str(name)
    }
}
