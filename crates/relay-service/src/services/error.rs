//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use relay_common::AppError;
use relay_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, crypto, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Access denied
    AccessDenied { reason: String },

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::AccessDenied { reason } => write!(f, "Access denied: {reason}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create an access denied error
    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this failure is a missing resource
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_not_found(),
            Self::App(e) => e.status_code() == 404,
            Self::NotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this failure is an authorization denial
    pub fn is_access_denied(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_authorization(),
            Self::App(e) => e.status_code() == 403,
            Self::AccessDenied { .. } => true,
            _ => false,
        }
    }

    /// Check if this failure is bad input
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_validation(),
            Self::App(e) => e.status_code() == 400,
            Self::Validation(_) => true,
            _ => false,
        }
    }

    /// Check if this failure is a conflict with existing state
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_conflict(),
            Self::App(e) => e.status_code() == 409,
            Self::Conflict(_) => true,
            _ => false,
        }
    }

    /// Get the error code for responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<relay_common::CipherError> for ServiceError {
    fn from(err: relay_common::CipherError) -> Self {
        Self::App(AppError::Crypto(err))
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("User", "123");
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("User not found: 123"));
    }

    #[test]
    fn test_access_denied_error() {
        let err = ServiceError::access_denied("different organization");
        assert!(err.is_access_denied());
        assert_eq!(err.error_code(), "ACCESS_DENIED");
    }

    #[test]
    fn test_domain_classification() {
        let err = ServiceError::from(DomainError::CrossOrganization);
        assert!(err.is_access_denied());
        assert!(!err.is_not_found());

        let err = ServiceError::from(DomainError::MessageNotFound(Uuid::nil()));
        assert!(err.is_not_found());

        let err = ServiceError::from(DomainError::AlreadyModerator);
        assert!(err.is_conflict());
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("empty message");
        assert!(err.is_validation());
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
