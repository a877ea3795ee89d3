//! Wire protocol
//!
//! JSON text frames of the shape `{"event": "<name>", "data": {…}}` in both
//! directions, with closed enums on each side.

mod events;

pub use events::{
    ClientEvent, ConnectedPayload, CreateRoomPayload, DeleteRoomPayload, ErrorKind, ErrorPayload,
    GroupMessagePayload, MarkNotificationReadPayload, MessageDeletedPayload,
    NotificationRefPayload, PresencePayload, PreviousMessagesPayload, ReactionAction,
    ReadMessagePayload, ReadReceiptPayload, RoomMemberPayload, RoomRefPayload,
    SendMessagePayload, SendRoomMessagePayload, ServerEvent, UpdateReactionPayload,
};
