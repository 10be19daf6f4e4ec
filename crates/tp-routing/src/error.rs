use thiserror::Error;

use tp_core::{GeoPoint, VertexId};

/// Configuration inconsistencies, reported once when a request is built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    #[error("no {0} given")]
    MissingEndpoint(&'static str),

    #[error("{0} is not a vertex of the graph")]
    VertexNotFound(VertexId),

    #[error("no vertex labelled {0:?}")]
    LabelNotFound(String),

    #[error("no vertex near {0}")]
    NoVertexNear(GeoPoint),

    #[error("request allows no travel mode")]
    EmptyModeSet,

    #[error("parameter {name} = {value} is out of range")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type RequestResult<T> = Result<T, RequestError>;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("no path from {from} to {to}")]
    NoPath { from: VertexId, to: VertexId },

    #[error("search gave up after {expansions} expansions")]
    SearchLimitExceeded { expansions: usize },
}

pub type RoutingResult<T> = Result<T, RoutingError>;
