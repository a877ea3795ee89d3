//! Room service
//!
//! Room lifecycle, membership changes, and moderator assignment.

use relay_core::entities::{ChatRoom, RoomMembership, User, UserRole};
use relay_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification::NotificationService;

/// Result of creating a room
#[derive(Debug)]
pub struct CreatedRoom {
    pub room: ChatRoom,
    /// All initial memberships; the creator holds the Moderator role
    pub memberships: Vec<RoomMembership>,
}

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a room with an initial member set
    ///
    /// The creator is always a member and gets the Moderator role; every
    /// other initial member gets User and a NewRoom notification. Admin-only
    /// enforcement happens at the gateway boundary.
    #[instrument(skip(self, creator, member_ids))]
    pub async fn create_room(
        &self,
        creator: &User,
        name: &str,
        is_private: bool,
        member_ids: &[Uuid],
    ) -> ServiceResult<CreatedRoom> {
        let mut room = ChatRoom::new(
            Uuid::new_v4(),
            name.to_string(),
            creator.organization_id,
            creator.id,
        );
        room.is_private = is_private;
        self.ctx.room_repo().create(&room).await?;

        let mut initial: Vec<Uuid> = vec![creator.id];
        for id in member_ids {
            if !initial.contains(id) {
                initial.push(*id);
            }
        }

        let notifications = NotificationService::new(self.ctx);
        let mut memberships = Vec::with_capacity(initial.len());
        for user_id in initial {
            let role = if user_id == creator.id {
                UserRole::Moderator
            } else {
                UserRole::User
            };
            let membership = RoomMembership::new(room.id, user_id, role);
            self.ctx.membership_repo().create(&membership).await?;

            if user_id != creator.id {
                // Best effort; the room is already committed
                if let Err(e) = notifications.notify_new_room(user_id, &room).await {
                    warn!(user_id = %user_id, room_id = %room.id, error = %e, "NewRoom notification failed");
                }
            }
            memberships.push(membership);
        }

        info!(room_id = %room.id, creator_id = %creator.id, members = memberships.len(), "Room created");

        Ok(CreatedRoom { room, memberships })
    }

    /// Delete a room; memberships and messages cascade at the storage layer
    #[instrument(skip(self))]
    pub async fn delete_room(&self, room_id: Uuid) -> ServiceResult<ChatRoom> {
        let room = self.require_room(room_id).await?;
        self.ctx.room_repo().delete(room_id).await?;

        info!(room_id = %room_id, "Room deleted");

        Ok(room)
    }

    /// Join a room in the user's organization; joining twice is a no-op
    #[instrument(skip(self))]
    pub async fn join_room(&self, user_id: Uuid, room_id: Uuid) -> ServiceResult<RoomMembership> {
        let access = AccessService::new(self.ctx);
        let user = access.require_user(user_id).await?;
        let room = self.require_room(room_id).await?;

        if user.organization_id != room.organization_id {
            return Err(DomainError::CrossOrganization.into());
        }

        let membership = RoomMembership::new(room_id, user_id, UserRole::User);
        self.ctx.membership_repo().create(&membership).await?;

        // A concurrent or prior join wins; return whatever is stored
        let stored = self
            .ctx
            .membership_repo()
            .find(room_id, user_id)
            .await?
            .unwrap_or(membership);

        info!(room_id = %room_id, user_id = %user_id, "Joined room");

        Ok(stored)
    }

    /// Leave a room; leaving a room the user is not in is a no-op
    #[instrument(skip(self))]
    pub async fn leave_room(&self, user_id: Uuid, room_id: Uuid) -> ServiceResult<()> {
        self.require_room(room_id).await?;
        self.ctx.membership_repo().delete(room_id, user_id).await?;

        info!(room_id = %room_id, user_id = %user_id, "Left room");

        Ok(())
    }

    /// Promote a room member to Moderator
    ///
    /// The actor needs moderation rights in the room; promoting someone who
    /// is already a moderator is rejected.
    #[instrument(skip(self, actor))]
    pub async fn assign_moderator(
        &self,
        actor: &User,
        room_id: Uuid,
        target_user_id: Uuid,
    ) -> ServiceResult<RoomMembership> {
        let room = self.require_room(room_id).await?;

        let access = AccessService::new(self.ctx);
        access.require_room_moderator(room_id, actor).await?;

        let mut membership = access.require_membership(room_id, target_user_id).await?;
        if membership.is_moderator() {
            return Err(DomainError::AlreadyModerator.into());
        }

        self.ctx
            .membership_repo()
            .update_role(room_id, target_user_id, UserRole::Moderator)
            .await?;
        membership.role = UserRole::Moderator;

        let notifications = NotificationService::new(self.ctx);
        if let Err(e) = notifications.notify_role_changed(target_user_id, &room).await {
            warn!(user_id = %target_user_id, room_id = %room_id, error = %e, "RoleChanged notification failed");
        }

        info!(room_id = %room_id, user_id = %target_user_id, actor_id = %actor.id, "Moderator assigned");

        Ok(membership)
    }

    /// List a room's memberships
    #[instrument(skip(self))]
    pub async fn members(&self, room_id: Uuid) -> ServiceResult<Vec<RoomMembership>> {
        Ok(self.ctx.membership_repo().find_by_room(room_id).await?)
    }

    /// List the rooms a user belongs to
    #[instrument(skip(self))]
    pub async fn rooms_of_user(&self, user_id: Uuid) -> ServiceResult<Vec<RoomMembership>> {
        Ok(self.ctx.membership_repo().find_by_user(user_id).await?)
    }

    async fn require_room(&self, room_id: Uuid) -> ServiceResult<ChatRoom> {
        Ok(self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?)
    }
}
