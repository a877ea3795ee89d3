//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    ChatRoom, Message, MessageReaction, Notification, RoomMembership, User, UserRole,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// List all users in an organization
    async fn find_by_organization(&self, organization_id: Uuid) -> RepoResult<Vec<User>>;

    /// Update online flag and last-seen timestamp
    async fn set_presence(
        &self,
        id: Uuid,
        is_online: bool,
        last_seen: DateTime<Utc>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ChatRoom>>;

    /// Create a new room
    async fn create(&self, room: &ChatRoom) -> RepoResult<()>;

    /// Delete a room; memberships and room messages cascade
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a membership record by room and user
    async fn find(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<Option<RoomMembership>>;

    /// List all memberships for a room
    async fn find_by_room(&self, room_id: Uuid) -> RepoResult<Vec<RoomMembership>>;

    /// List all memberships for a user
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<RoomMembership>>;

    /// Check if user is a member of room
    async fn is_member(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    /// Add a member; no-op if the membership already exists
    async fn create(&self, membership: &RoomMembership) -> RepoResult<()>;

    /// Change a member's role within a room
    async fn update_role(&self, room_id: Uuid, user_id: Uuid, role: UserRole) -> RepoResult<()>;

    /// Remove a member from a room; no-op if absent
    async fn delete(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// Newest messages visible to an organization, most recent first
    async fn find_recent_by_organization(
        &self,
        organization_id: Uuid,
        limit: i64,
    ) -> RepoResult<Vec<Message>>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Append a read receipt; returns false if the user had already read
    /// the message
    async fn append_read_receipt(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> RepoResult<bool>;

    /// Hard delete a message; reactions cascade
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Get all reactions for a message
    async fn find_by_message(&self, message_id: Uuid) -> RepoResult<Vec<MessageReaction>>;

    /// Add a reaction; no-op if the same triple already exists
    async fn create(&self, reaction: &MessageReaction) -> RepoResult<()>;

    /// Remove a reaction; no-op if absent
    async fn delete(&self, message_id: Uuid, user_id: Uuid, reaction: &str) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find notification by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Notification>>;

    /// List notifications for a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Notification>>;

    /// Create a new notification
    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// Mark a notification as read
    async fn mark_read(&self, id: Uuid) -> RepoResult<()>;
}
