//! Room lifecycle, membership, typing, and room message handlers

use crate::connection::Connection;
use crate::handlers::HandlerResult;
use crate::protocol::{
    CreateRoomPayload, DeleteRoomPayload, GroupMessagePayload, MessageDeletedPayload,
    ReadReceiptPayload, RoomMemberPayload, RoomRefPayload, SendRoomMessagePayload, ServerEvent,
};
use crate::server::GatewayState;
use relay_service::{AccessService, ChatService, NotificationService, RoomDto, RoomService};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Handle `create_room` (admin only)
#[instrument(skip_all, fields(creator_id = %connection.user_id()))]
pub async fn create_room(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: CreateRoomPayload,
) -> HandlerResult<()> {
    AccessService::new(state.services()).require_admin(connection.user())?;

    let rooms = RoomService::new(state.services());
    let created = rooms
        .create_room(
            connection.user(),
            &payload.name,
            payload.is_private,
            &payload.user_ids,
        )
        .await?;

    let dto = RoomDto::from(&created.room);

    // Online members start receiving room traffic immediately
    for membership in &created.memberships {
        if let Some(member) = state.registry().resolve(membership.user_id) {
            state.registry().subscribe_room(created.room.id, member.id());
            if membership.user_id != connection.user_id() {
                member.try_send(ServerEvent::RoomCreated(dto.clone())).ok();
            }
        }
    }

    connection
        .send(ServerEvent::RoomCreatedSuccess(dto))
        .await
        .ok();

    Ok(())
}

/// Handle `delete_room` (admin only)
#[instrument(skip_all, fields(actor_id = %connection.user_id()))]
pub async fn delete_room(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: DeleteRoomPayload,
) -> HandlerResult<()> {
    AccessService::new(state.services()).require_admin(connection.user())?;

    let rooms = RoomService::new(state.services());
    rooms.delete_room(payload.room_id).await?;

    let event = ServerEvent::RoomDeleted(RoomRefPayload {
        room_id: payload.room_id,
    });
    state
        .registry()
        .send_to_room(payload.room_id, &event, Some(connection.user_id()));
    state.registry().drop_room(payload.room_id);

    connection
        .send(ServerEvent::RoomDeletedSuccess(RoomRefPayload {
            room_id: payload.room_id,
        }))
        .await
        .ok();

    Ok(())
}

/// Handle `join_room`
#[instrument(skip_all, fields(user_id = %connection.user_id()))]
pub async fn join_room(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: RoomRefPayload,
) -> HandlerResult<()> {
    let rooms = RoomService::new(state.services());
    rooms
        .join_room(connection.user_id(), payload.room_id)
        .await?;

    state
        .registry()
        .subscribe_room(payload.room_id, connection.id());

    let event = ServerEvent::UserJoined(RoomMemberPayload {
        room_id: payload.room_id,
        user_id: connection.user_id(),
    });
    state
        .registry()
        .send_to_room(payload.room_id, &event, Some(connection.user_id()));

    connection
        .send(ServerEvent::JoinRoomSuccess(payload))
        .await
        .ok();

    Ok(())
}

/// Handle `leave_room`
#[instrument(skip_all, fields(user_id = %connection.user_id()))]
pub async fn leave_room(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: RoomRefPayload,
) -> HandlerResult<()> {
    let rooms = RoomService::new(state.services());
    rooms
        .leave_room(connection.user_id(), payload.room_id)
        .await?;

    state
        .registry()
        .unsubscribe_room(payload.room_id, connection.id());

    let event = ServerEvent::UserLeft(RoomMemberPayload {
        room_id: payload.room_id,
        user_id: connection.user_id(),
    });
    state
        .registry()
        .send_to_room(payload.room_id, &event, Some(connection.user_id()));

    connection
        .send(ServerEvent::LeaveRoomSuccess(payload))
        .await
        .ok();

    Ok(())
}

/// Handle `typing` / `stop_typing`: fire-and-forget, no persistence, no ack
pub fn typing(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: RoomRefPayload,
    started: bool,
) -> HandlerResult<()> {
    let member = RoomMemberPayload {
        room_id: payload.room_id,
        user_id: connection.user_id(),
    };
    let event = if started {
        ServerEvent::UserTyping(member)
    } else {
        ServerEvent::UserStopTyping(member)
    };

    state
        .registry()
        .send_to_room(payload.room_id, &event, Some(connection.user_id()));

    Ok(())
}

/// Handle `send_room_message`
///
/// Members who are not viewing the room get a NewMessage notification;
/// notification failures never undo the committed message.
#[instrument(skip_all, fields(sender_id = %connection.user_id()))]
pub async fn send_room_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: SendRoomMessagePayload,
) -> HandlerResult<()> {
    let chat = ChatService::new(state.services());
    let outcome = chat
        .send_to_room(connection.user_id(), payload.room_id, &payload.message)
        .await?;

    let event = ServerEvent::NewRoomMessage(outcome.message.clone());
    state
        .registry()
        .send_to_room(payload.room_id, &event, Some(connection.user_id()));

    let notifications = NotificationService::new(state.services());
    for membership in &outcome.members {
        if membership.user_id == connection.user_id()
            || state
                .registry()
                .is_viewing_room(membership.user_id, payload.room_id)
        {
            continue;
        }
        if let Err(e) = notifications
            .notify_new_message(
                membership.user_id,
                &outcome.sender,
                payload.room_id,
                outcome.message.id,
            )
            .await
        {
            warn!(
                user_id = %membership.user_id,
                room_id = %payload.room_id,
                error = %e,
                "NewMessage notification failed"
            );
        }
    }

    connection
        .send(ServerEvent::RoomMessageSent(outcome.message))
        .await
        .ok();

    Ok(())
}

/// Handle `read_group_message`
#[instrument(skip_all, fields(user_id = %connection.user_id()))]
pub async fn read_group_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: GroupMessagePayload,
) -> HandlerResult<()> {
    let chat = ChatService::new(state.services());
    let outcome = chat
        .mark_read_in_room(connection.user_id(), payload.message_id, payload.room_id)
        .await?;

    if outcome.newly_read {
        let event = ServerEvent::UserReadMessage(ReadReceiptPayload {
            message_id: payload.message_id,
            user_id: connection.user_id(),
            room_id: Some(payload.room_id),
        });
        state
            .registry()
            .send_to_room(payload.room_id, &event, Some(connection.user_id()));
    }

    Ok(())
}

/// Handle `delete_group_message` (room moderators and admins)
#[instrument(skip_all, fields(actor_id = %connection.user_id()))]
pub async fn delete_group_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: GroupMessagePayload,
) -> HandlerResult<()> {
    let chat = ChatService::new(state.services());
    chat.delete_room_message(connection.user(), payload.room_id, payload.message_id)
        .await?;

    let event = ServerEvent::MessageDeleted(MessageDeletedPayload {
        message_id: payload.message_id,
        room_id: payload.room_id,
    });
    state
        .registry()
        .send_to_room(payload.room_id, &event, Some(connection.user_id()));

    connection.send(event).await.ok();

    Ok(())
}
