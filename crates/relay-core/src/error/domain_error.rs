//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Room not found: {0}")]
    RoomNotFound(Uuid),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),

    #[error("User is not a member of this room")]
    MembershipNotFound,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Sender and recipient belong to different organizations")]
    CrossOrganization,

    #[error("Moderator or admin role required in this room")]
    NotRoomModerator,

    #[error("Admin role required")]
    AdminRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User is already a member of this room")]
    AlreadyMember,

    #[error("User is already a moderator of this room")]
    AlreadyModerator,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for protocol responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::MembershipNotFound => "NOT_IN_ROOM",
            Self::CrossOrganization => "OUTSIDE_ORGANIZATION",
            Self::NotRoomModerator => "MISSING_MODERATOR_ROLE",
            Self::AdminRequired => "MISSING_ADMIN_ROLE",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyModerator => "ALREADY_MODERATOR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::CryptoError(_) => "CRYPTO_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::RoomNotFound(_)
                | Self::MessageNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::MembershipNotFound
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::CrossOrganization | Self::NotRoomModerator | Self::AdminRequired
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyMember | Self::AlreadyModerator)
    }
}
