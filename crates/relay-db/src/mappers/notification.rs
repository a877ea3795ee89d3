//! Notification entity <-> model mapper

use relay_core::entities::{Notification, NotificationKind};

use crate::models::NotificationModel;

/// Convert NotificationModel to Notification entity
///
/// Unknown kind strings fall back to NEW_MESSAGE.
impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: model.id,
            user_id: model.user_id,
            kind: NotificationKind::parse(&model.kind).unwrap_or(NotificationKind::NewMessage),
            content: model.content,
            is_read: model.is_read,
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }
}
