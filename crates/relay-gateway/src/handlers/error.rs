//! Handler error types

use crate::protocol::{ErrorKind, ServerEvent};
use relay_service::ServiceError;
use std::time::Duration;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Sender is inside their direct-message cooldown window
    #[error("Rate limited, retry in {}ms", retry_after.as_millis())]
    RateLimited { retry_after: Duration },

    /// Request carried an unusable action or payload
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Service layer failure
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// Map to the wire error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimitError,
            Self::InvalidAction(_) => ErrorKind::InvalidAction,
            Self::Service(e) => {
                if e.is_not_found() {
                    ErrorKind::NotFound
                } else if e.is_access_denied() {
                    ErrorKind::AccessDenied
                } else if e.is_validation() || e.is_conflict() {
                    ErrorKind::InvalidAction
                } else {
                    ErrorKind::ServerError
                }
            }
        }
    }

    /// Build the `error_event` frame for this failure
    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::error(self.kind(), self.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::DomainError;
    use uuid::Uuid;

    #[test]
    fn test_rate_limit_kind() {
        let err = HandlerError::RateLimited {
            retry_after: Duration::from_millis(3200),
        };
        assert_eq!(err.kind(), ErrorKind::RateLimitError);
        assert!(err.to_string().contains("3200"));
    }

    #[test]
    fn test_service_error_mapping() {
        let err = HandlerError::from(ServiceError::from(DomainError::CrossOrganization));
        assert_eq!(err.kind(), ErrorKind::AccessDenied);

        let err = HandlerError::from(ServiceError::from(DomainError::MessageNotFound(Uuid::nil())));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = HandlerError::from(ServiceError::from(DomainError::AlreadyModerator));
        assert_eq!(err.kind(), ErrorKind::InvalidAction);

        let err = HandlerError::from(ServiceError::internal("boom"));
        assert_eq!(err.kind(), ErrorKind::ServerError);
    }

    #[test]
    fn test_to_event_is_error_event() {
        let err = HandlerError::InvalidAction("unknown reaction action".to_string());
        let json = err.to_event().to_json().unwrap();
        assert!(json.contains(r#""event":"error_event""#));
        assert!(json.contains(r#""type":"INVALID_ACTION""#));
    }
}
