//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;
use crate::ports::{AuthError, MediaError};

/// Domain errors - business logic failures surfaced to handlers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Only the author may modify post {post_id}")]
    Permission { post_id: PostId },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Uniqueness violation: {0}")]
    Unique(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::not_found("record", "requested id"),
            RepoError::Unique(msg) => DomainError::Duplicate(msg),
            RepoError::Constraint(msg) => DomainError::Internal(format!("constraint: {msg}")),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<MediaError> for DomainError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Storage(msg) => DomainError::Internal(format!("media: {msg}")),
            other => DomainError::validation("image", other.to_string()),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                DomainError::InvalidCredentials
            }
            AuthError::HashingError(msg) => DomainError::Internal(format!("password hashing: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_becomes_duplicate() {
        let err: DomainError = RepoError::Unique("groups.slug".to_string()).into();
        assert!(matches!(err, DomainError::Duplicate(msg) if msg == "groups.slug"));
    }

    #[test]
    fn test_validation_message() {
        let err = DomainError::validation("text", "must not be blank");
        assert_eq!(err.to_string(), "Invalid text: must not be blank");
    }

    #[test]
    fn test_auth_failures_hide_details() {
        let err: DomainError = AuthError::TokenExpired.into();
        assert!(matches!(err, DomainError::InvalidCredentials));

        let err: DomainError = AuthError::HashingError("salt".into()).into();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
