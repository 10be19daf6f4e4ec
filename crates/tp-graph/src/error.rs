//! Graph-construction error type.

use thiserror::Error;

use tp_core::VertexId;

/// Errors produced by [`GraphBuilder`](crate::GraphBuilder).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    #[error("duplicate vertex label {0:?}")]
    DuplicateLabel(String),

    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from:   VertexId,
        to:     VertexId,
        reason: String,
    },

    #[error("invalid trip pattern {route:?}: {reason}")]
    InvalidPattern { route: String, reason: String },
}

pub type GraphResult<T> = Result<T, GraphError>;
