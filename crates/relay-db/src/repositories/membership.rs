//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use relay_core::entities::{RoomMembership, UserRole};
use relay_core::traits::{MembershipRepository, RepoResult};

use crate::models::MembershipModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<Option<RoomMembership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT room_id, user_id, role, joined_at
            FROM room_members
            WHERE room_id = $1 AND user_id = $2
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RoomMembership::from))
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: Uuid) -> RepoResult<Vec<RoomMembership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT room_id, user_id, role, joined_at
            FROM room_members
            WHERE room_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RoomMembership::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<RoomMembership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT room_id, user_id, role, joined_at
            FROM room_members
            WHERE user_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RoomMembership::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_member(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM room_members WHERE room_id = $1 AND user_id = $2)
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, membership))]
    async fn create(&self, membership: &RoomMembership) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO room_members (room_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (room_id, user_id) DO NOTHING
            "#,
        )
        .bind(membership.room_id)
        .bind(membership.user_id)
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_role(&self, room_id: Uuid, user_id: Uuid, role: UserRole) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE room_members SET role = $3 WHERE room_id = $1 AND user_id = $2
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM room_members WHERE room_id = $1 AND user_id = $2
            "#,
        )
        .bind(room_id)
        .bind(user_id)
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
        assert_send_sync::<PgMembershipRepository>();
    }
}
