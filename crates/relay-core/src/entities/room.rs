//! Chat room and membership entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserRole;

/// A named, organization-scoped group conversation.
///
/// Rooms exist independently of live connections; deleting a room cascades
/// to its memberships and messages at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    pub fn new(id: Uuid, name: String, organization_id: Uuid, created_by: Uuid) -> Self {
        Self {
            id,
            name,
            organization_id,
            created_by,
            is_private: false,
            created_at: Utc::now(),
        }
    }
}

/// Membership of a user in a room (junction between User and ChatRoom).
///
/// Invariant: at most one row per (room, user) pair, enforced by the
/// storage layer's composite primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMembership {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub joined_at: DateTime<Utc>,
}

impl RoomMembership {
    pub fn new(room_id: Uuid, user_id: Uuid, role: UserRole) -> Self {
        Self {
            room_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Check whether this membership grants room-level moderation
    #[inline]
    pub fn is_moderator(&self) -> bool {
        self.role.can_moderate()
    }
}
