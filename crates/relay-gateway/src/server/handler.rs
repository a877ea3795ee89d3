//! WebSocket handler
//!
//! Authenticates the handshake, runs the per-socket receive/send tasks, and
//! guarantees cleanup on every exit path.

use crate::connection::Connection;
use crate::handlers;
use crate::protocol::{
    ClientEvent, ConnectedPayload, ErrorKind, PresencePayload, PreviousMessagesPayload,
    ServerEvent,
};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, HeaderMap},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use relay_core::entities::User;
use relay_service::{AccessService, ChatService, PresenceService, RoomService};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel buffer size for outgoing events
const EVENT_BUFFER_SIZE: usize = 100;

/// Number of recent messages sent on connect
const SNAPSHOT_LIMIT: i64 = 100;

/// WebSocket gateway handler
///
/// The bearer credential is taken from the HTTP handshake's `Authorization`
/// header; the auth verdict is delivered over the upgraded socket.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let token = bearer_token(&headers);
    ws.on_upgrade(move |socket| handle_socket(state, socket, token))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, mut socket: WebSocket, token: Option<String>) {
    let user = match authenticate(&state, token.as_deref()).await {
        Ok(user) => user,
        Err(reason) => {
            tracing::info!(reason = %reason, "Rejecting unauthenticated connection");
            reject(&mut socket, &reason).await;
            return;
        }
    };

    let (tx, mut rx) = mpsc::channel::<ServerEvent>(EVENT_BUFFER_SIZE);
    let connection = Connection::new(user.clone(), tx);

    if let Some(superseded) = state.registry().register(connection.clone()) {
        tracing::info!(
            user_id = %user.id,
            superseded_id = %superseded.id(),
            "New connection supersedes an existing one"
        );
    }

    tracing::info!(
        connection_id = %connection.id(),
        user_id = %user.id,
        "WebSocket connection established"
    );

    subscribe_memberships(&state, &connection).await;

    // Every connection, the new one included, sees the presence change
    state.registry().broadcast(
        &ServerEvent::UserOnline(PresencePayload { user_id: user.id }),
        None,
    );

    if let Err(e) = PresenceService::new(state.services())
        .update_user_status(user.id, true)
        .await
    {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to persist online presence");
    }

    connection
        .send(ServerEvent::Connected(ConnectedPayload { user_id: user.id }))
        .await
        .ok();
    send_snapshot(&state, &connection, &user).await;

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Receive task: per-connection events are processed in order
    let state_recv = state.clone();
    let connection_recv = connection.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_frame(&state_recv, &connection_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    connection_recv
                        .send(ServerEvent::error(
                            ErrorKind::InvalidAction,
                            "binary frames are not supported",
                        ))
                        .await
                        .ok();
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::info!(
                        connection_id = %connection_recv.id(),
                        "Client closed connection"
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    // Send task: serializes events and feeds the sink
    let connection_send = connection.clone();
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        connection_id = %connection_send.id(),
                        error = %e,
                        "Failed to serialize outbound event"
                    );
                }
            }
        }
        ws_sink.close().await.ok();
    });

    tokio::select! {
        _ = recv_task => {}
        _ = send_task => {}
    }

    cleanup_connection(&state, &connection).await;
}

/// Resolve the bearer credential to a user
async fn authenticate(state: &GatewayState, token: Option<&str>) -> Result<User, String> {
    let token = token.ok_or_else(|| "missing bearer credential".to_string())?;

    let claims = state
        .jwt()
        .decode_token(token)
        .map_err(|e| e.to_string())?;
    let user_id = claims.user_id().map_err(|e| e.to_string())?;

    AccessService::new(state.services())
        .require_user(user_id)
        .await
        .map_err(|e| e.to_string())
}

/// Emit AUTH_ERROR and force-close the socket
async fn reject(socket: &mut WebSocket, reason: &str) {
    let event = ServerEvent::error(ErrorKind::AuthError, reason);
    if let Ok(json) = event.to_json() {
        socket.send(Message::Text(json.into())).await.ok();
    }
    socket.send(Message::Close(None)).await.ok();
}

/// Subscribe the connection to all of the user's room memberships
async fn subscribe_memberships(state: &GatewayState, connection: &Arc<Connection>) {
    let rooms = RoomService::new(state.services());
    match rooms.rooms_of_user(connection.user_id()).await {
        Ok(memberships) => {
            for membership in memberships {
                state
                    .registry()
                    .subscribe_room(membership.room_id, connection.id());
            }
        }
        Err(e) => {
            tracing::warn!(
                user_id = %connection.user_id(),
                error = %e,
                "Failed to load room memberships"
            );
        }
    }
}

/// Send the decrypted recent-message snapshot
async fn send_snapshot(state: &GatewayState, connection: &Arc<Connection>, user: &User) {
    let chat = ChatService::new(state.services());
    match chat.recent_messages(user, SNAPSHOT_LIMIT).await {
        Ok(messages) => {
            connection
                .send(ServerEvent::PreviousMessages(PreviousMessagesPayload {
                    messages,
                }))
                .await
                .ok();
        }
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to load recent messages");
            connection
                .send(ServerEvent::error(
                    ErrorKind::ServerError,
                    "could not load recent messages",
                ))
                .await
                .ok();
        }
    }
}

/// Parse and dispatch one text frame
///
/// Failures are reported to the originating connection only; the socket
/// stays open.
async fn handle_text_frame(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    let event = match ClientEvent::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Unparseable frame"
            );
            connection
                .send(ServerEvent::error(
                    ErrorKind::InvalidAction,
                    "unrecognized event or malformed payload",
                ))
                .await
                .ok();
            return;
        }
    };

    tracing::debug!(
        connection_id = %connection.id(),
        event = event.name(),
        "Event received"
    );

    if let Err(e) = handlers::dispatch(state, connection, event).await {
        tracing::debug!(
            connection_id = %connection.id(),
            error = %e,
            "Handler rejected event"
        );
        connection.send(e.to_event()).await.ok();
    }
}

/// Clean up a connection on disconnect; runs on every exit path
async fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    tracing::info!(
        connection_id = %connection.id(),
        user_id = %connection.user_id(),
        "Cleaning up connection"
    );

    let was_current = state.registry().unregister(connection.id());

    // A superseded connection must not mark the user offline
    if was_current {
        if let Err(e) = PresenceService::new(state.services())
            .update_user_status(connection.user_id(), false)
            .await
        {
            tracing::warn!(
                user_id = %connection.user_id(),
                error = %e,
                "Failed to persist offline presence"
            );
        }
    }
}
