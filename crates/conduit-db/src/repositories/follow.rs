//! PostgreSQL implementation of FollowRepository

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conduit_core::error::DomainError;
use conduit_core::traits::{FollowRepository, RepoResult};
use conduit_core::value_objects::UserId;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of FollowRepository
#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    #[instrument(skip(self))]
    async fn exists(&self, follower: UserId, following: UserId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2
            )
            ",
        )
        .bind(follower.into_inner())
        .bind(following.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    async fn following_among(
        &self,
        follower: UserId,
        candidates: &[UserId],
    ) -> RepoResult<HashSet<UserId>> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }

        let raw: Vec<i64> = candidates.iter().map(|id| id.into_inner()).collect();
        let rows = sqlx::query_scalar::<_, i64>(
            r"
            SELECT following_id FROM follows
            WHERE follower_id = $1 AND following_id = ANY($2)
            ",
        )
        .bind(follower.into_inner())
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserId::new).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, follower: UserId, following: UserId) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            ",
        )
        .bind(follower.into_inner())
        .bind(following.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyFollowing))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, follower: UserId, following: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM follows WHERE follower_id = $1 AND following_id = $2
            ",
        )
        .bind(follower.into_inner())
        .bind(following.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
