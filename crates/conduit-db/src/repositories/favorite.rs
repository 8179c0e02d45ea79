//! PostgreSQL implementation of FavoriteRepository

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conduit_core::traits::{FavoriteRepository, RepoResult};
use conduit_core::value_objects::{ArticleId, UserId};

use super::error::map_db_error;

/// PostgreSQL implementation of FavoriteRepository
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    #[instrument(skip(self))]
    async fn exists(&self, user: UserId, article: ArticleId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND article_id = $2)
            ",
        )
        .bind(user.into_inner())
        .bind(article.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, articles), fields(count = articles.len()))]
    async fn favorited_among(
        &self,
        user: UserId,
        articles: &[ArticleId],
    ) -> RepoResult<HashSet<ArticleId>> {
        if articles.is_empty() {
            return Ok(HashSet::new());
        }

        let raw: Vec<i64> = articles.iter().map(|id| id.into_inner()).collect();
        let rows = sqlx::query_scalar::<_, i64>(
            r"
            SELECT article_id FROM favorites
            WHERE user_id = $1 AND article_id = ANY($2)
            ",
        )
        .bind(user.into_inner())
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ArticleId::new).collect())
    }
}
