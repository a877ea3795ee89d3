//! User entity <-> model mapper

use relay_core::entities::{User, UserRole};

use crate::models::UserModel;

/// Convert UserModel to User entity
///
/// Unknown role strings fall back to the regular user role.
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            organization_id: model.organization_id,
            role: UserRole::parse(&model.role).unwrap_or(UserRole::User),
            is_online: model.is_online,
            last_seen: model.last_seen,
            created_at: model.created_at,
        }
    }
}
