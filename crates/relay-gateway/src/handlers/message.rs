//! Direct message, read receipt, and reaction handlers

use crate::connection::Connection;
use crate::handlers::{HandlerError, HandlerResult};
use crate::protocol::{
    ReactionAction, ReadMessagePayload, ReadReceiptPayload, SendMessagePayload, ServerEvent,
    UpdateReactionPayload,
};
use crate::server::GatewayState;
use relay_core::entities::Message;
use relay_service::{ChatService, ReactionDto, ReactionService};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Handle `send_message`: rate-limited, same-organization, encrypted at rest
#[instrument(skip_all, fields(sender_id = %connection.user_id()))]
pub async fn send_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: SendMessagePayload,
) -> HandlerResult<()> {
    state
        .limiter()
        .check(connection.user_id(), Instant::now())
        .map_err(|retry_after| HandlerError::RateLimited { retry_after })?;

    let chat = ChatService::new(state.services());
    let outcome = chat
        .send_direct(connection.user_id(), payload.recipient_id, &payload.message)
        .await?;

    if let Some(recipient) = state.registry().resolve(outcome.recipient.id) {
        recipient
            .try_send(ServerEvent::NewPrivateMessage(outcome.message.clone()))
            .ok();
    } else {
        debug!(recipient_id = %outcome.recipient.id, "Recipient offline, message stored only");
    }

    connection
        .send(ServerEvent::MessageSent(outcome.message))
        .await
        .ok();

    Ok(())
}

/// Handle `read_message`: idempotent receipt, broadcast only on first read
#[instrument(skip_all, fields(user_id = %connection.user_id()))]
pub async fn read_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: ReadMessagePayload,
) -> HandlerResult<()> {
    let chat = ChatService::new(state.services());
    let outcome = chat
        .mark_read(connection.user_id(), payload.message_id)
        .await?;

    if outcome.newly_read {
        announce_read(state, connection, &outcome.message);
    }

    Ok(())
}

fn announce_read(state: &GatewayState, connection: &Arc<Connection>, message: &Message) {
    let event = ServerEvent::UserReadMessage(ReadReceiptPayload {
        message_id: message.id,
        user_id: connection.user_id(),
        room_id: message.room_id,
    });

    match message.room_id {
        Some(room_id) => {
            state
                .registry()
                .send_to_room(room_id, &event, Some(connection.user_id()));
        }
        None => {
            if message.sender_id != connection.user_id() {
                if let Some(sender) = state.registry().resolve(message.sender_id) {
                    sender.try_send(event).ok();
                }
            }
        }
    }
}

/// Handle `update_reaction`: idempotent add/remove, unknown actions rejected
#[instrument(skip_all, fields(user_id = %connection.user_id()))]
pub async fn update_reaction(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: UpdateReactionPayload,
) -> HandlerResult<()> {
    let reactions = ReactionService::new(state.services());

    let (outcome, event) = match payload.action {
        ReactionAction::Add => {
            let outcome = reactions
                .add_reaction(connection.user_id(), payload.message_id, &payload.reaction)
                .await?;
            let event = ServerEvent::ReactionAdded(ReactionDto::from(&outcome.reaction));
            (outcome, event)
        }
        ReactionAction::Remove => {
            let outcome = reactions
                .remove_reaction(connection.user_id(), payload.message_id, &payload.reaction)
                .await?;
            let event = ServerEvent::ReactionRemoved(ReactionDto::from(&outcome.reaction));
            (outcome, event)
        }
        ReactionAction::Unknown => {
            return Err(HandlerError::InvalidAction(
                "reaction action must be add or remove".to_string(),
            ));
        }
    };

    match outcome.message.room_id {
        Some(room_id) => {
            state
                .registry()
                .send_to_room(room_id, &event, Some(connection.user_id()));
        }
        None => {
            if outcome.message.sender_id != connection.user_id() {
                if let Some(sender) = state.registry().resolve(outcome.message.sender_id) {
                    sender.try_send(event.clone()).ok();
                }
            }
        }
    }

    connection.send(event).await.ok();

    Ok(())
}
