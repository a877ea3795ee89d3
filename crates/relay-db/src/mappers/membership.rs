//! Room membership entity <-> model mapper

use relay_core::entities::{RoomMembership, UserRole};

use crate::models::MembershipModel;

/// Convert MembershipModel to RoomMembership entity
impl From<MembershipModel> for RoomMembership {
    fn from(model: MembershipModel) -> Self {
        RoomMembership {
            room_id: model.room_id,
            user_id: model.user_id,
            role: UserRole::parse(&model.role).unwrap_or(UserRole::User),
            joined_at: model.joined_at,
        }
    }
}
