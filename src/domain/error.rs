//! Domain-level errors (no I/O concerns)

use thiserror::Error;

use crate::domain::tree::NodeId;

/// Domain errors represent violations of the tree model's rules.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("node not found in tree: {0}")]
    NodeNotFound(NodeId),

    #[error("malformed tree document: {message}")]
    Deserialization { message: String },

    #[error("no node ids left after {0}")]
    IdSpaceExhausted(NodeId),

    #[error("a tree needs at least one node, got {0}")]
    InvalidTreeSize(usize),

    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid arrow type {0:?}: expected none, to, from or both")]
    InvalidArrowType(String),

    #[error("invalid tree settings: {message}")]
    InvalidSettings { message: String },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomainError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }
}

/// Result type for tree model operations.
pub type DomainResult<T> = Result<T, DomainError>;
