//! Notification service
//!
//! Creates and manages offline/absent-member notifications. Creation
//! failures are reported to the caller, which logs and moves on; they never
//! roll back the action that triggered them.

use relay_core::entities::{ChatRoom, Notification, NotificationKind, User};
use relay_core::DomainError;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Notify a room member about a message they were not present for
    #[instrument(skip(self, sender))]
    pub async fn notify_new_message(
        &self,
        user_id: Uuid,
        sender: &User,
        room_id: Uuid,
        message_id: Uuid,
    ) -> ServiceResult<Notification> {
        let notification = Notification::new(
            Uuid::new_v4(),
            user_id,
            NotificationKind::NewMessage,
            format!("New message from {}", sender.display_name),
            json!({ "roomId": room_id, "messageId": message_id, "senderId": sender.id }),
        );
        self.ctx.notification_repo().create(&notification).await?;
        Ok(notification)
    }

    /// Notify a user they were added to a newly created room
    #[instrument(skip(self, room))]
    pub async fn notify_new_room(&self, user_id: Uuid, room: &ChatRoom) -> ServiceResult<Notification> {
        let notification = Notification::new(
            Uuid::new_v4(),
            user_id,
            NotificationKind::NewRoom,
            format!("You were added to {}", room.name),
            json!({ "roomId": room.id }),
        );
        self.ctx.notification_repo().create(&notification).await?;
        Ok(notification)
    }

    /// Notify a user their room role changed
    #[instrument(skip(self, room))]
    pub async fn notify_role_changed(
        &self,
        user_id: Uuid,
        room: &ChatRoom,
    ) -> ServiceResult<Notification> {
        let notification = Notification::new(
            Uuid::new_v4(),
            user_id,
            NotificationKind::RoleChanged,
            format!("You are now a moderator of {}", room.name),
            json!({ "roomId": room.id }),
        );
        self.ctx.notification_repo().create(&notification).await?;
        Ok(notification)
    }

    /// List a user's notifications, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<Notification>> {
        Ok(self.ctx.notification_repo().find_by_user(user_id).await?)
    }

    /// Mark a notification read; absent or foreign-owned ids are not found
    #[instrument(skip(self))]
    pub async fn mark_as_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> ServiceResult<Notification> {
        let mut notification = self
            .ctx
            .notification_repo()
            .find_by_id(notification_id)
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or(DomainError::NotificationNotFound(notification_id))?;

        self.ctx.notification_repo().mark_read(notification_id).await?;
        notification.is_read = true;

        info!(notification_id = %notification_id, user_id = %user_id, "Notification read");

        Ok(notification)
    }
}
