//! Reaction service
//!
//! Idempotent add/remove of message reactions.

use relay_core::entities::{Message, MessageReaction};
use relay_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Result of a reaction mutation
///
/// Carries the target message so callers can route the event to the room
/// or to the direct-message counterpart.
#[derive(Debug)]
pub struct ReactionOutcome {
    pub message: Message,
    pub reaction: MessageReaction,
}

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a reaction to a message; a duplicate add is a no-op that still
    /// returns the reaction row
    #[instrument(skip(self))]
    pub async fn add_reaction(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        reaction: &str,
    ) -> ServiceResult<ReactionOutcome> {
        let message = self.require_message(message_id).await?;

        let row = MessageReaction::new(message_id, user_id, reaction.to_string());
        self.ctx.reaction_repo().create(&row).await?;

        info!(message_id = %message_id, user_id = %user_id, "Reaction added");

        Ok(ReactionOutcome {
            message,
            reaction: row,
        })
    }

    /// Remove a reaction from a message; removing an absent reaction is a
    /// no-op
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        reaction: &str,
    ) -> ServiceResult<ReactionOutcome> {
        let message = self.require_message(message_id).await?;

        self.ctx
            .reaction_repo()
            .delete(message_id, user_id, reaction)
            .await?;

        info!(message_id = %message_id, user_id = %user_id, "Reaction removed");

        Ok(ReactionOutcome {
            message,
            reaction: MessageReaction::new(message_id, user_id, reaction.to_string()),
        })
    }

    async fn require_message(&self, message_id: Uuid) -> ServiceResult<Message> {
        Ok(self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?)
    }
}
