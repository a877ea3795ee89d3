//! Presence service
//!
//! Persists the online flag and last-seen timestamp on connect/disconnect.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a user's online state; last_seen is always refreshed
    #[instrument(skip(self))]
    pub async fn update_user_status(&self, user_id: Uuid, is_online: bool) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .set_presence(user_id, is_online, Utc::now())
            .await?;

        info!(user_id = %user_id, is_online, "Presence updated");

        Ok(())
    }
}
