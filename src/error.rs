//! Error type shared by the engine, the allocation editor and the loaders

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Asset allocations must sum to 100% (got {actual:.4}%)")]
    AllocationSum { actual: f64 },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown asset class: {0}")]
    AssetNotFound(String),

    #[error("Allocation of {0} cannot be changed: asset is locked or no unlocked asset can absorb the change")]
    AllocationLocked(String),

    #[error("A portfolio needs more than {min} asset classes before one can be removed")]
    MinimumAssets { min: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
