//! Chat room entity <-> model mapper

use relay_core::entities::ChatRoom;

use crate::models::RoomModel;

/// Convert RoomModel to ChatRoom entity
impl From<RoomModel> for ChatRoom {
    fn from(model: RoomModel) -> Self {
        ChatRoom {
            id: model.id,
            name: model.name,
            organization_id: model.organization_id,
            created_by: model.created_by,
            is_private: model.is_private,
            created_at: model.created_at,
        }
    }
}
