//! Message reaction entity <-> model mapper

use relay_core::entities::MessageReaction;

use crate::models::ReactionModel;

/// Convert ReactionModel to MessageReaction entity
impl From<ReactionModel> for MessageReaction {
    fn from(model: ReactionModel) -> Self {
        MessageReaction {
            message_id: model.message_id,
            user_id: model.user_id,
            reaction: model.reaction,
            created_at: model.created_at,
        }
    }
}
