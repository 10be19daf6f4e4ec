//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they parse core values.

use thiserror::Error;

/// Errors produced while parsing or validating `tp-core` values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("unknown traverse mode {0:?}")]
    UnknownMode(String),

    #[error("unknown street permission {0:?}")]
    UnknownPermission(String),

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `tp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
