//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use relay_core::entities::Message;
use relay_core::traits::{MessageRepository, RepoResult};

use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, room_id, sender_id, content, is_encrypted, read_by, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_recent_by_organization(
        &self,
        organization_id: Uuid,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.room_id, m.sender_id, m.content, m.is_encrypted, m.read_by, m.created_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE u.organization_id = $1
            ORDER BY m.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(organization_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, room_id, sender_id, content, is_encrypted, read_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(message.room_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.is_encrypted)
        .bind(serde_json::to_value(&message.read_by).unwrap_or_else(|_| serde_json::json!([])))
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn append_read_receipt(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        // The containment guard makes the append idempotent: a second receipt
        // for the same user matches no rows.
        let receipt = serde_json::json!([{ "userId": user_id, "readAt": read_at }]);

        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read_by = read_by || $2::jsonb
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM jsonb_array_elements(read_by) AS r
                  WHERE r->'userId' = $3::jsonb
              )
            "#,
        )
        .bind(message_id)
        .bind(receipt)
        .bind(serde_json::json!(user_id))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM messages WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}
