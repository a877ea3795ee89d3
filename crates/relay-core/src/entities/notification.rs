//! Notification entity - offline/absent-member fan-out records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of notification delivered to a user's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewMessage,
    NewRoom,
    RoleChanged,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewMessage => "NEW_MESSAGE",
            Self::NewRoom => "NEW_ROOM",
            Self::RoleChanged => "ROLE_CHANGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_MESSAGE" => Some(Self::NewMessage),
            "NEW_ROOM" => Some(Self::NewRoom),
            "ROLE_CHANGED" => Some(Self::RoleChanged),
            _ => None,
        }
    }
}

/// Notification entity. Metadata is opaque JSON carrying room/message/sender
/// ids for the client to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub content: String,
    pub is_read: bool,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        kind: NotificationKind,
        content: String,
        metadata: Value,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            content,
            is_read: false,
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            NotificationKind::NewMessage,
            NotificationKind::NewRoom,
            NotificationKind::RoleChanged,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("MENTION"), None);
    }

    #[test]
    fn test_new_notification_unread() {
        let n = Notification::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NotificationKind::NewRoom,
            "Added to New Room".into(),
            serde_json::json!({ "roomId": Uuid::new_v4() }),
        );
        assert!(!n.is_read);
    }
}
