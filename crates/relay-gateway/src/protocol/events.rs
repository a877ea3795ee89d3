//! Gateway event definitions
//!
//! Inbound (`ClientEvent`) and outbound (`ServerEvent`) frames. Both sides
//! use the adjacently-tagged form `{"event": "<name>", "data": {…}}` with
//! camelCase payload fields.

use relay_service::{MessageDto, ReactionDto, RoomDto};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reaction mutation requested by a client
///
/// Unknown values deserialize to `Unknown` so a bad action is rejected with
/// a typed error instead of tearing down the frame parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionAction {
    Add,
    Remove,
    #[serde(other)]
    Unknown,
}

/// Error taxonomy reported through `error_event`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AuthError,
    RateLimitError,
    AccessDenied,
    InvalidAction,
    NotFound,
    ServerError,
}

impl ErrorKind {
    /// Wire string form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthError => "AUTH_ERROR",
            Self::RateLimitError => "RATE_LIMIT_ERROR",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::InvalidAction => "INVALID_ACTION",
            Self::NotFound => "NOT_FOUND",
            Self::ServerError => "SERVER_ERROR",
        }
    }
}

// === Inbound payloads ===

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub recipient_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadMessagePayload {
    pub message_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReactionPayload {
    pub message_id: Uuid,
    pub reaction: String,
    pub action: ReactionAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRoomPayload {
    pub room_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRoomMessagePayload {
    pub room_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessagePayload {
    pub message_id: Uuid,
    pub room_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkNotificationReadPayload {
    pub notification_id: Uuid,
}

/// Events a client may send while authenticated
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage(SendMessagePayload),
    ReadMessage(ReadMessagePayload),
    UpdateReaction(UpdateReactionPayload),
    CreateRoom(CreateRoomPayload),
    DeleteRoom(DeleteRoomPayload),
    JoinRoom(RoomRefPayload),
    LeaveRoom(RoomRefPayload),
    Typing(RoomRefPayload),
    StopTyping(RoomRefPayload),
    SendRoomMessage(SendRoomMessagePayload),
    ReadGroupMessage(GroupMessagePayload),
    DeleteGroupMessage(GroupMessagePayload),
    MarkNotificationRead(MarkNotificationReadPayload),
}

impl ClientEvent {
    /// Deserialize a text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::SendMessage(_) => "send_message",
            Self::ReadMessage(_) => "read_message",
            Self::UpdateReaction(_) => "update_reaction",
            Self::CreateRoom(_) => "create_room",
            Self::DeleteRoom(_) => "delete_room",
            Self::JoinRoom(_) => "join_room",
            Self::LeaveRoom(_) => "leave_room",
            Self::Typing(_) => "typing",
            Self::StopTyping(_) => "stop_typing",
            Self::SendRoomMessage(_) => "send_room_message",
            Self::ReadGroupMessage(_) => "read_group_message",
            Self::DeleteGroupMessage(_) => "delete_group_message",
            Self::MarkNotificationRead(_) => "mark_notification_read",
        }
    }
}

// === Outbound payloads ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRefPayload {
    pub room_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousMessagesPayload {
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceiptPayload {
    pub message_id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMemberPayload {
    pub room_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletedPayload {
    pub message_id: Uuid,
    pub room_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRefPayload {
    pub notification_id: Uuid,
}

/// Events the gateway sends to clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected(ConnectedPayload),
    PreviousMessages(PreviousMessagesPayload),
    UserOnline(PresencePayload),
    ErrorEvent(ErrorPayload),
    NewPrivateMessage(MessageDto),
    MessageSent(MessageDto),
    UserReadMessage(ReadReceiptPayload),
    ReactionAdded(ReactionDto),
    ReactionRemoved(ReactionDto),
    RoomCreated(RoomDto),
    RoomCreatedSuccess(RoomDto),
    RoomDeleted(RoomRefPayload),
    RoomDeletedSuccess(RoomRefPayload),
    UserJoined(RoomMemberPayload),
    JoinRoomSuccess(RoomRefPayload),
    UserLeft(RoomMemberPayload),
    LeaveRoomSuccess(RoomRefPayload),
    UserTyping(RoomMemberPayload),
    UserStopTyping(RoomMemberPayload),
    NewRoomMessage(MessageDto),
    RoomMessageSent(MessageDto),
    MessageDeleted(MessageDeletedPayload),
    NotificationRead(NotificationRefPayload),
}

impl ServerEvent {
    /// Build an `error_event` frame
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::ErrorEvent(ErrorPayload {
            kind,
            message: message.into(),
        })
    }

    /// Serialize to a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_message() {
        let recipient = Uuid::new_v4();
        let json = format!(
            r#"{{"event":"send_message","data":{{"recipientId":"{recipient}","message":"hi"}}}}"#
        );

        match ClientEvent::from_json(&json).unwrap() {
            ClientEvent::SendMessage(p) => {
                assert_eq!(p.recipient_id, recipient);
                assert_eq!(p.message, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_room_defaults() {
        let json = r#"{"event":"create_room","data":{"name":"general"}}"#;

        match ClientEvent::from_json(json).unwrap() {
            ClientEvent::CreateRoom(p) => {
                assert_eq!(p.name, "general");
                assert!(!p.is_private);
                assert!(p.user_ids.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_reaction_action() {
        let message = Uuid::new_v4();
        let json = format!(
            r#"{{"event":"update_reaction","data":{{"messageId":"{message}","reaction":"👍","action":"toggle"}}}}"#
        );

        match ClientEvent::from_json(&json).unwrap() {
            ClientEvent::UpdateReaction(p) => {
                assert_eq!(p.action, ReactionAction::Unknown);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_rejected() {
        let json = r#"{"event":"self_destruct","data":{}}"#;
        assert!(ClientEvent::from_json(json).is_err());
    }

    #[test]
    fn test_error_event_shape() {
        let event = ServerEvent::error(ErrorKind::RateLimitError, "slow down");
        let json = event.to_json().unwrap();

        assert!(json.contains(r#""event":"error_event""#));
        assert!(json.contains(r#""type":"RATE_LIMIT_ERROR""#));
        assert!(json.contains("slow down"));
    }

    #[test]
    fn test_outbound_event_names() {
        let event = ServerEvent::UserTyping(RoomMemberPayload {
            room_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        });
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""event":"user_typing""#));
        assert!(json.contains(r#""roomId""#));
    }

    #[test]
    fn test_error_kind_strings() {
        assert_eq!(ErrorKind::AuthError.as_str(), "AUTH_ERROR");
        assert_eq!(ErrorKind::AccessDenied.as_str(), "ACCESS_DENIED");
        assert_eq!(ErrorKind::InvalidAction.as_str(), "INVALID_ACTION");
        assert_eq!(ErrorKind::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorKind::ServerError.as_str(), "SERVER_ERROR");
    }
}
