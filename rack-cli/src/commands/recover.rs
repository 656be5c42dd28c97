//! Recovery actions. Reserved: nodes are recovered at the end of each
//! simulation, so these only log.

use tracing::info;

use super::Command;

/// Run a recovery action.
pub fn run(command: Command) {
    info!(action = %command, "recovery action is reserved and does nothing");
}
