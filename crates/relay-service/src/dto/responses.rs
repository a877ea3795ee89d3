//! Wire response DTOs
//!
//! Shapes serialized into gateway event payloads. Message content here is
//! always plaintext; decryption happens before a DTO is built.

use chrono::{DateTime, Utc};
use relay_core::entities::{ChatRoom, Message, MessageReaction, Notification, ReadReceipt};
use serde::Serialize;
use uuid::Uuid;

/// A message as delivered to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: String,
    pub read_by: Vec<ReadReceipt>,
    pub created_at: DateTime<Utc>,
}

impl MessageDto {
    /// Build a DTO from a persisted message and its decrypted content
    pub fn from_decrypted(message: &Message, content: String) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            content,
            read_by: message.read_by.clone(),
            created_at: message.created_at,
        }
    }
}

/// A reaction as delivered to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionDto {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub reaction: String,
}

impl From<&MessageReaction> for ReactionDto {
    fn from(reaction: &MessageReaction) -> Self {
        Self {
            message_id: reaction.message_id,
            user_id: reaction.user_id,
            reaction: reaction.reaction.clone(),
        }
    }
}

/// A room as delivered to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: Uuid,
    pub name: String,
    pub is_private: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatRoom> for RoomDto {
    fn from(room: &ChatRoom) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            is_private: room.is_private,
            created_by: room.created_by,
            created_at: room.created_at,
        }
    }
}

/// A notification as delivered to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    pub kind: String,
    pub content: String,
    pub is_read: bool,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationDto {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.as_str().to_string(),
            content: notification.content.clone(),
            is_read: notification.is_read,
            metadata: notification.metadata.clone(),
            created_at: notification.created_at,
        }
    }
}
