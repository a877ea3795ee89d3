//! Inbound event handlers
//!
//! Each handler validates and authorizes independently; a failure produces a
//! typed `error_event` for the originating connection only.

mod error;
mod message;
mod notification;
mod room;

pub use error::{HandlerError, HandlerResult};

use crate::connection::Connection;
use crate::protocol::ClientEvent;
use crate::server::GatewayState;
use std::sync::Arc;

/// Route an inbound event to its handler
pub async fn dispatch(
    state: &GatewayState,
    connection: &Arc<Connection>,
    event: ClientEvent,
) -> HandlerResult<()> {
    match event {
        ClientEvent::SendMessage(p) => message::send_message(state, connection, p).await,
        ClientEvent::ReadMessage(p) => message::read_message(state, connection, p).await,
        ClientEvent::UpdateReaction(p) => message::update_reaction(state, connection, p).await,
        ClientEvent::CreateRoom(p) => room::create_room(state, connection, p).await,
        ClientEvent::DeleteRoom(p) => room::delete_room(state, connection, p).await,
        ClientEvent::JoinRoom(p) => room::join_room(state, connection, p).await,
        ClientEvent::LeaveRoom(p) => room::leave_room(state, connection, p).await,
        ClientEvent::Typing(p) => room::typing(state, connection, p, true),
        ClientEvent::StopTyping(p) => room::typing(state, connection, p, false),
        ClientEvent::SendRoomMessage(p) => room::send_room_message(state, connection, p).await,
        ClientEvent::ReadGroupMessage(p) => room::read_group_message(state, connection, p).await,
        ClientEvent::DeleteGroupMessage(p) => {
            room::delete_group_message(state, connection, p).await
        }
        ClientEvent::MarkNotificationRead(p) => {
            notification::mark_notification_read(state, connection, p).await
        }
    }
}
