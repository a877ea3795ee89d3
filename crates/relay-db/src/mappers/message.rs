//! Message entity <-> model mapper

use relay_core::entities::{Message, ReadReceipt};

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
///
/// Malformed entries in the read_by JSONB array are dropped rather than
/// failing the whole row.
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        let read_by: Vec<ReadReceipt> = model
            .read_by
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Message {
            id: model.id,
            room_id: model.room_id,
            sender_id: model.sender_id,
            content: model.content,
            is_encrypted: model.is_encrypted,
            read_by,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_read_by_parsing() {
        let reader = Uuid::new_v4();
        let model = MessageModel {
            id: Uuid::new_v4(),
            room_id: None,
            sender_id: Uuid::new_v4(),
            content: "ct".into(),
            is_encrypted: true,
            read_by: serde_json::json!([
                { "userId": reader, "readAt": Utc::now() },
                { "bogus": true },
            ]),
            created_at: Utc::now(),
        };

        let message = Message::from(model);
        assert_eq!(message.read_by.len(), 1);
        assert!(message.read_by_user(reader));
    }

    #[test]
    fn test_read_by_not_an_array() {
        let model = MessageModel {
            id: Uuid::new_v4(),
            room_id: Some(Uuid::new_v4()),
            sender_id: Uuid::new_v4(),
            content: "ct".into(),
            is_encrypted: true,
            read_by: serde_json::json!(null),
            created_at: Utc::now(),
        };

        let message = Message::from(model);
        assert!(message.read_by.is_empty());
    }
}
