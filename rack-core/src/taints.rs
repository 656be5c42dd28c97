//! Taint-set arithmetic for simulated failures.
//!
//! Both functions take the taint list from a fresh node read and return the
//! full replacement list, preserving every taint they do not own.

use rack_types::{Taint, SIMULATED_FAILURE_KEY};

/// Taint list with the simulated-failure taint appended.
///
/// Returns `None` when the taint is already present, so repeated failure
/// injection never duplicates it.
pub fn with_simulated_failure(current: &[Taint]) -> Option<Vec<Taint>> {
    if current.iter().any(Taint::is_simulated_failure) {
        return None;
    }
    let mut taints = current.to_vec();
    taints.push(Taint::simulated_failure());
    Some(taints)
}

/// Taint list with every simulated-failure taint removed.
pub fn without_simulated_failure(current: &[Taint]) -> Vec<Taint> {
    current
        .iter()
        .filter(|taint| taint.key != SIMULATED_FAILURE_KEY)
        .cloned()
        .collect()
}
