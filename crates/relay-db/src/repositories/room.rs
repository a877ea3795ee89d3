//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use relay_core::entities::ChatRoom;
use relay_core::traits::{RepoResult, RoomRepository};

use crate::models::RoomModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ChatRoom>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, organization_id, created_by, is_private, created_at
            FROM chat_rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatRoom::from))
    }

    #[instrument(skip(self, room))]
    async fn create(&self, room: &ChatRoom) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_rooms (id, name, organization_id, created_by, is_private, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(room.organization_id)
        .bind(room.created_by)
        .bind(room.is_private)
        .bind(room.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM chat_rooms WHERE id = $1
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
        assert_send_sync::<PgRoomRepository>();
    }
}
