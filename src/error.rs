//! Error types for the bootstrap.

use crate::dom::NodeId;
use thiserror::Error;

/// Main error type for bootstrap, bus and mount operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Marker {node} is missing attribute {attribute:?}")]
    MissingAttribute { node: NodeId, attribute: String },

    #[error("Invalid marker configuration for <{tag}>: {reason}")]
    InvalidConfig { tag: String, reason: String },

    #[error("Node {0} has no parent")]
    Detached(NodeId),

    #[error("Node {node} cannot be placed under its own descendant {parent}")]
    Hierarchy { node: NodeId, parent: NodeId },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Mount failed for <{tag}>: {reason}")]
    Mount { tag: String, reason: String },

    #[error("Handler for {event:?} failed: {reason}")]
    Handler { event: String, reason: String },

    #[error("Delivery of {event:?} failed for {} store(s)", .failures.len())]
    Delivery {
        event: String,
        failures: Vec<BootstrapError>,
    },

    #[error("Diagnostic sink error: {0}")]
    Sink(String),

    #[error("Bootstrap already ran")]
    AlreadyBootstrapped,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BootstrapError {
    /// Build a handler failure for `event`.
    pub fn handler(event: &str, reason: impl Into<String>) -> Self {
        BootstrapError::Handler {
            event: event.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BootstrapError {
    fn from(e: serde_json::Error) -> Self {
        BootstrapError::Serialization(e.to_string())
    }
}

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
