//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for messages table
///
/// `read_by` maps to a JSONB column holding an array of read receipts.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub content: String,
    pub is_encrypted: bool,
    pub read_by: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    /// Check if this is a direct (user-to-user) message
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.room_id.is_none()
    }
}
