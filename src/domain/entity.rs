//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all tree nodes.
//! Every node has a string id that is unique among nodes of its kind.

use serde::{Deserialize, Serialize};

/// Core trait for all tree nodes
pub trait Entity: Clone {
    /// Returns the node's unique identifier
    fn id(&self) -> &str;
}

impl<T: Entity> Entity for std::sync::Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::InvalidInput(e.to_string())
    }
}

/// Position of the node with `id` in `nodes`
pub fn position_of<T: Entity>(nodes: &[T], id: &str) -> Option<usize> {
    nodes.iter().position(|node| node.id() == id)
}
