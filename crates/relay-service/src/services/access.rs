//! Access control service
//!
//! Tenancy and room authorization checks shared by the other services.

use relay_core::entities::{RoomMembership, User};
use relay_core::DomainError;
use tracing::instrument;
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access control service
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    /// Create a new AccessService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a user or fail with a not-found error
    #[instrument(skip(self))]
    pub async fn require_user(&self, user_id: Uuid) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::from(DomainError::UserNotFound(user_id)))
    }

    /// Reject interactions that cross organization boundaries
    pub fn ensure_same_organization(&self, sender: &User, recipient: &User) -> ServiceResult<()> {
        if sender.same_organization(recipient) {
            Ok(())
        } else {
            Err(DomainError::CrossOrganization.into())
        }
    }

    /// Load the membership of a user in a room or fail
    #[instrument(skip(self))]
    pub async fn require_membership(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<RoomMembership> {
        self.ctx
            .membership_repo()
            .find(room_id, user_id)
            .await?
            .ok_or_else(|| DomainError::MembershipNotFound.into())
    }

    /// Require room moderation rights: a Moderator/Admin membership role,
    /// or the global admin role.
    #[instrument(skip(self, user))]
    pub async fn require_room_moderator(&self, room_id: Uuid, user: &User) -> ServiceResult<()> {
        if user.is_admin() {
            return Ok(());
        }

        let membership = self.require_membership(room_id, user.id).await?;
        if membership.role.can_moderate() {
            Ok(())
        } else {
            Err(DomainError::NotRoomModerator.into())
        }
    }

    /// Require the global admin role
    pub fn require_admin(&self, user: &User) -> ServiceResult<()> {
        if user.is_admin() {
            Ok(())
        } else {
            Err(DomainError::AdminRequired.into())
        }
    }
}
