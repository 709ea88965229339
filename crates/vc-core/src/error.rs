//! Error types for VocalCut

use crate::BackendId;
use thiserror::Error;

/// Core error type
///
/// Unequal input lengths are not an error: every kernel truncates to the
/// shorter input.
#[derive(Error, Debug)]
pub enum VcError {
    #[error("No implementation registered for backend {0}")]
    UnsupportedBackend(BackendId),

    #[error("Boundary failure in {backend}: {reason}")]
    Boundary { backend: BackendId, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VcError {
    pub fn boundary(backend: BackendId, reason: impl Into<String>) -> Self {
        Self::Boundary {
            backend,
            reason: reason.into(),
        }
    }

    /// True for failures raised while crossing the foreign boundary
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Boundary { .. })
    }
}

/// Result type alias
pub type VcResult<T> = Result<T, VcError>;
