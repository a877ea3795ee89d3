//! Notification handlers

use crate::connection::Connection;
use crate::handlers::HandlerResult;
use crate::protocol::{MarkNotificationReadPayload, NotificationRefPayload, ServerEvent};
use crate::server::GatewayState;
use relay_service::NotificationService;
use std::sync::Arc;
use tracing::instrument;

/// Handle `mark_notification_read`: ownership-checked, NOT_FOUND otherwise
#[instrument(skip_all, fields(user_id = %connection.user_id()))]
pub async fn mark_notification_read(
    state: &GatewayState,
    connection: &Arc<Connection>,
    payload: MarkNotificationReadPayload,
) -> HandlerResult<()> {
    let notifications = NotificationService::new(state.services());
    let notification = notifications
        .mark_as_read(connection.user_id(), payload.notification_id)
        .await?;

    connection
        .send(ServerEvent::NotificationRead(NotificationRefPayload {
            notification_id: notification.id,
        }))
        .await
        .ok();

    Ok(())
}
