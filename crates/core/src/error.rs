//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (bad configuration, bad keys).
/// Retrieval and IO concerns belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed configuration).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A SKU was empty or otherwise unusable as a grouping key.
    #[error("invalid sku: {0}")]
    InvalidSku(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_sku(msg: impl Into<String>) -> Self {
        Self::InvalidSku(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            DomainError::validation("columns.sku is empty").to_string(),
            "validation failed: columns.sku is empty"
        );
        assert_eq!(
            DomainError::invalid_sku("blank").to_string(),
            "invalid sku: blank"
        );
    }
}
