//! Mock backend for dry simulations.
//!
//! Logs what would happen, sleeps a short fixed delay, and records the call.
//! Never fails.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::info;

use rack_types::NodeName;

use super::{BackendError, BackendKind, FailureBackend};

/// A power operation the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `power_off(node)`.
    PowerOff(NodeName),
    /// `power_on(node)`.
    PowerOn(NodeName),
}

/// Simulated backend.
///
/// Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockBackend {
    /// Create a mock that sleeps `delay` per operation.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::default(),
        }
    }

    /// Calls received, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: MockCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl FailureBackend for MockBackend {
    async fn power_off(&self, node: &NodeName) -> Result<(), BackendError> {
        info!(node = %node, "[MOCK] would cordon and taint node");
        self.record(MockCall::PowerOff(node.clone()));
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn power_on(&self, node: &NodeName) -> Result<(), BackendError> {
        info!(node = %node, "[MOCK] would remove taint and uncordon node");
        self.record(MockCall::PowerOn(node.clone()));
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }
}
