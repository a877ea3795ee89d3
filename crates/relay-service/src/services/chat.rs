//! Chat service
//!
//! Direct and room messaging: encryption at rest, read receipts, moderated
//! deletion, and the recent-message snapshot sent on connect.

use chrono::Utc;
use relay_core::entities::{Message, RoomMembership, User};
use relay_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::MessageDto;

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Result of sending a direct message
#[derive(Debug)]
pub struct DirectMessageOutcome {
    pub message: MessageDto,
    pub sender: User,
    pub recipient: User,
}

/// Result of sending a room message
#[derive(Debug)]
pub struct RoomMessageOutcome {
    pub message: MessageDto,
    pub sender: User,
    /// All memberships of the room, including the sender's
    pub members: Vec<RoomMembership>,
}

/// Result of marking a message read
#[derive(Debug)]
pub struct ReadOutcome {
    pub message: Message,
    /// False when the user had already read the message
    pub newly_read: bool,
}

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a direct message to another user in the same organization
    ///
    /// The content is encrypted before persistence; the returned DTO carries
    /// the plaintext for delivery.
    #[instrument(skip(self, content))]
    pub async fn send_direct(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: &str,
    ) -> ServiceResult<DirectMessageOutcome> {
        let access = AccessService::new(self.ctx);
        let sender = access.require_user(sender_id).await?;
        let recipient = access.require_user(recipient_id).await?;
        access.ensure_same_organization(&sender, &recipient)?;

        let ciphertext = self.ctx.cipher().encrypt(content)?;
        let message = Message::new_direct(Uuid::new_v4(), sender_id, ciphertext);
        self.ctx.message_repo().create(&message).await?;

        info!(message_id = %message.id, sender_id = %sender_id, "Direct message sent");

        Ok(DirectMessageOutcome {
            message: MessageDto::from_decrypted(&message, content.to_string()),
            sender,
            recipient,
        })
    }

    /// Send a message to a room the sender is a member of
    #[instrument(skip(self, content))]
    pub async fn send_to_room(
        &self,
        sender_id: Uuid,
        room_id: Uuid,
        content: &str,
    ) -> ServiceResult<RoomMessageOutcome> {
        let access = AccessService::new(self.ctx);
        let sender = access.require_user(sender_id).await?;

        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;
        access.require_membership(room_id, sender_id).await?;

        let ciphertext = self.ctx.cipher().encrypt(content)?;
        let message = Message::new_room(Uuid::new_v4(), room_id, sender_id, ciphertext);
        self.ctx.message_repo().create(&message).await?;

        let members = self.ctx.membership_repo().find_by_room(room_id).await?;

        info!(message_id = %message.id, room_id = %room_id, "Room message sent");

        Ok(RoomMessageOutcome {
            message: MessageDto::from_decrypted(&message, content.to_string()),
            sender,
            members,
        })
    }

    /// Mark a message as read by a user; idempotent
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Uuid, message_id: Uuid) -> ServiceResult<ReadOutcome> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let newly_read = self
            .ctx
            .message_repo()
            .append_read_receipt(message_id, user_id, Utc::now())
            .await?;

        Ok(ReadOutcome {
            message,
            newly_read,
        })
    }

    /// Mark a room message as read; the message must belong to the given
    /// room. The check runs before the receipt is appended so a mismatched
    /// room id never mutates the read-by set.
    #[instrument(skip(self))]
    pub async fn mark_read_in_room(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        room_id: Uuid,
    ) -> ServiceResult<ReadOutcome> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|m| m.room_id == Some(room_id))
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let newly_read = self
            .ctx
            .message_repo()
            .append_read_receipt(message_id, user_id, Utc::now())
            .await?;

        Ok(ReadOutcome {
            message,
            newly_read,
        })
    }

    /// Delete a room message; requires moderation rights in that room
    #[instrument(skip(self, actor))]
    pub async fn delete_room_message(
        &self,
        actor: &User,
        room_id: Uuid,
        message_id: Uuid,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.room_id != Some(room_id) {
            return Err(DomainError::MessageNotFound(message_id).into());
        }

        let access = AccessService::new(self.ctx);
        access.require_room_moderator(room_id, actor).await?;

        self.ctx.message_repo().delete(message_id).await?;

        info!(message_id = %message_id, room_id = %room_id, actor_id = %actor.id, "Room message deleted");

        Ok(())
    }

    /// Newest messages visible to the user's organization, decrypted for
    /// transmission. Messages that fail decryption are skipped, not fatal.
    #[instrument(skip(self, user))]
    pub async fn recent_messages(&self, user: &User, limit: i64) -> ServiceResult<Vec<MessageDto>> {
        let messages = self
            .ctx
            .message_repo()
            .find_recent_by_organization(user.organization_id, limit)
            .await?;

        let mut out = Vec::with_capacity(messages.len());
        for message in &messages {
            match self.decrypt_content(message) {
                Ok(content) => out.push(MessageDto::from_decrypted(message, content)),
                Err(_) => {
                    warn!(message_id = %message.id, "Skipping message that failed decryption");
                }
            }
        }

        Ok(out)
    }

    /// Decrypt a stored message body
    pub fn decrypt_content(&self, message: &Message) -> ServiceResult<String> {
        if message.is_encrypted {
            Ok(self.ctx.cipher().decrypt(&message.content)?)
        } else {
            Ok(message.content.clone())
        }
    }
}
