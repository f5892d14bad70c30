//! Error taxonomy for shape extraction and the type cache.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShapeError {
    /// Caller contract violation: empty property name, non-enumerable input,
    /// nesting deeper than the configured limit.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Type generation failed: {0}")]
    Generation(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShapeError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;
