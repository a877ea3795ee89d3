//! Message entity - encrypted at rest, decrypted only for delivery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single read acknowledgment. Each user appears at most once in a
/// message's read-by set; appends are idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub user_id: Uuid,
    pub read_at: DateTime<Utc>,
}

/// Message entity. `room_id` is `None` for direct messages.
///
/// `content` holds ciphertext whenever `is_encrypted` is set; plaintext is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: String,
    pub is_encrypted: bool,
    pub read_by: Vec<ReadReceipt>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new direct message
    pub fn new_direct(id: Uuid, sender_id: Uuid, content: String) -> Self {
        Self {
            id,
            room_id: None,
            sender_id,
            content,
            is_encrypted: true,
            read_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a new room message
    pub fn new_room(id: Uuid, room_id: Uuid, sender_id: Uuid, content: String) -> Self {
        Self {
            id,
            room_id: Some(room_id),
            sender_id,
            content,
            is_encrypted: true,
            read_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check if this is a direct (user-to-user) message
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.room_id.is_none()
    }

    /// Check whether a user has already read this message
    pub fn read_by_user(&self, user_id: Uuid) -> bool {
        self.read_by.iter().any(|r| r.user_id == user_id)
    }

    /// Append a read receipt; returns false (and leaves the set unchanged)
    /// if the user had already read the message.
    pub fn mark_read(&mut self, user_id: Uuid, read_at: DateTime<Utc>) -> bool {
        if self.read_by_user(user_id) {
            return false;
        }
        self.read_by.push(ReadReceipt { user_id, read_at });
        true
    }
}
