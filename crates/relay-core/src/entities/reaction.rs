//! Message reaction entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A reaction on a message by a user.
///
/// Invariant: at most one row per (message, user, reaction) triple,
/// enforced by the storage layer; adds and removals are idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReaction {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub reaction: String,
    pub created_at: DateTime<Utc>,
}

impl MessageReaction {
    pub fn new(message_id: Uuid, user_id: Uuid, reaction: String) -> Self {
        Self {
            message_id,
            user_id,
            reaction,
            created_at: Utc::now(),
        }
    }
}
