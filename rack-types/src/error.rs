//! Error types for cluster API access.

use thiserror::Error;

/// Errors returned by the cluster API surface.
///
/// The variants follow how the orchestrator reacts to them:
/// an authorization failure selects the mock backend, a missing resource
/// is local to one target, and everything else is a transient observation
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// The caller lacks permission for the request (HTTP 403).
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The requested resource does not exist (HTTP 404).
    #[error("{kind} not found: {name}")]
    ResourceNotFound {
        /// Resource kind, e.g. "node".
        kind: String,
        /// Resource name.
        name: String,
    },

    /// Network, timeout or server-side failure.
    #[error("transient cluster error: {0}")]
    Transient(String),
}

impl ClusterError {
    /// Shorthand for a missing node.
    pub fn node_not_found(name: &str) -> Self {
        Self::ResourceNotFound {
            kind: "node".into(),
            name: name.into(),
        }
    }

    /// Whether this is an authorization failure.
    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, Self::AuthorizationDenied(_))
    }

    /// Whether this is a missing-resource failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}
