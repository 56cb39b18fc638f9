use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (duplicate email and the like)
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Backend failure. The detail is for logs, never for clients.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Token signing, hashing and other non-storage failures
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        DomainError::Unauthorized(message.into())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
