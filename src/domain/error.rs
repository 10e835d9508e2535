//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid inputs to the compensation engine.
/// Every variant is detected synchronously; none of them is transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("invalid topology: generation {generation} has {affiliate_count} affiliates but generation {} is empty", .generation - 1)]
    InvalidTopology {
        generation: usize,
        affiliate_count: u32,
    },
}

impl DomainError {
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Reject negative, NaN and infinite volumes.
pub(crate) fn ensure_volume(name: &str, value: f64) -> DomainResult<f64> {
    if !value.is_finite() {
        return Err(DomainError::invalid_parameter(
            name,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(DomainError::invalid_parameter(
            name,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(value)
}
