//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use conduit_core::entities::{Comment, NewComment};
use conduit_core::error::DomainError;
use conduit_core::traits::{CommentRepository, RepoResult};
use conduit_core::value_objects::{ArticleId, CommentId};

use crate::models::CommentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, body, article_id, author_id, created_at, updated_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_by_article(&self, article_id: ArticleId) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, body, article_id, author_id, created_at, updated_at
            FROM comments
            WHERE article_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(article_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, comment), fields(article_id = %comment.article_id))]
    async fn create(&self, comment: NewComment) -> RepoResult<Comment> {
        let row = sqlx::query_as::<_, CommentModel>(
            r"
            INSERT INTO comments (body, article_id, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, body, article_id, author_id, created_at, updated_at
            ",
        )
        .bind(&comment.body)
        .bind(comment.article_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Comment::from(row))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CommentId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(id));
        }

        Ok(())
    }
}
