//! User entity - represents an organization member

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Global role of a user within their organization.
///
/// The same enum doubles as the per-room membership role: room-scoped
/// moderation only distinguishes `User` from `Moderator`/`Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl UserRole {
    /// Check whether the role carries moderation rights.
    #[inline]
    pub fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }

    /// Database string form (matches the `user_role` column values).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Moderator => "MODERATOR",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse the database string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Self::User),
            "MODERATOR" => Some(Self::Moderator),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub organization_id: Uuid,
    pub role: UserRole,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Uuid, email: String, display_name: String, organization_id: Uuid) -> Self {
        Self {
            id,
            email,
            display_name,
            organization_id,
            role: UserRole::User,
            is_online: false,
            last_seen: None,
            created_at: Utc::now(),
        }
    }

    /// Check if this user belongs to the same organization as another
    #[inline]
    pub fn same_organization(&self, other: &User) -> bool {
        self.organization_id == other.organization_id
    }

    /// Check if the user holds the global admin role
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
