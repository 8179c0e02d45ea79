//! PostgreSQL unit of work: every multi-row write runs inside one of these
//! transactions

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::{debug, instrument};

use conduit_core::entities::{Article, NewArticle, Tag};
use conduit_core::error::DomainError;
use conduit_core::traits::{RepoResult, Transaction, UnitOfWork};
use conduit_core::value_objects::{ArticleId, TagId, UserId};

use crate::models::{ArticleModel, TagModel};

use super::error::{map_db_error, map_unique_violation};

/// Opens [`PgTransaction`]s on a pool
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// An open PostgreSQL transaction.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
pub struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl Transaction for PgTransaction {
    #[instrument(skip(self, article), fields(slug = %article.slug))]
    async fn insert_article(&mut self, article: NewArticle) -> RepoResult<Article> {
        let row = sqlx::query_as::<_, ArticleModel>(
            r"
            INSERT INTO articles
                (slug, title, description, body, tag_list, author_id, is_draft, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, slug, title, description, body, tag_list, author_id,
                      favorites_count, is_draft, created_at, updated_at
            ",
        )
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(article.tag_list.to_column())
        .bind(article.author_id.into_inner())
        .bind(article.is_draft)
        .bind(article.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::SlugTaken))?;

        Ok(Article::from(row))
    }

    #[instrument(skip(self, article), fields(id = %article.id, slug = %article.slug))]
    async fn update_article(&mut self, article: &Article) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE articles
            SET slug = $2, title = $3, description = $4, body = $5, tag_list = $6,
                is_draft = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(article.id.into_inner())
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(article.tag_list.to_column())
        .bind(article.is_draft)
        .bind(article.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::SlugTaken))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ArticleNotFound(article.slug.clone()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_article(&mut self, id: ArticleId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ArticleNotFound(id.to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_tag_by_name(&mut self, name: &str) -> RepoResult<Option<Tag>> {
        let result = sqlx::query_as::<_, TagModel>("SELECT id, name, slug FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Tag::from))
    }

    #[instrument(skip(self))]
    async fn insert_tag(&mut self, name: &str, slug: &str) -> RepoResult<Tag> {
        let row = sqlx::query_as::<_, TagModel>(
            r"
            INSERT INTO tags (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            ",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::TagRelation(format!("tag '{name}' was created concurrently"))
            })
        })?;

        debug!(tag = %row.name, "Tag created");
        Ok(Tag::from(row))
    }

    #[instrument(skip(self))]
    async fn link_tag(&mut self, article_id: ArticleId, tag_id: TagId) -> RepoResult<()> {
        sqlx::query("INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2)")
            .bind(article_id.into_inner())
            .bind(tag_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| DomainError::TagRelation(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unlink_tags(&mut self, article_id: ArticleId) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn insert_favorite(&mut self, user: UserId, article: ArticleId) -> RepoResult<()> {
        sqlx::query("INSERT INTO favorites (user_id, article_id) VALUES ($1, $2)")
            .bind(user.into_inner())
            .bind(article.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::AlreadyFavorited))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_favorite(&mut self, user: UserId, article: ArticleId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND article_id = $2")
            .bind(user.into_inner())
            .bind(article.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_favorites(&mut self, article_id: ArticleId) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM favorites WHERE article_id = $1")
            .bind(article_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_comments(&mut self, article_id: ArticleId) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE article_id = $1")
            .bind(article_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn adjust_favorites_count(
        &mut self,
        article_id: ArticleId,
        delta: i64,
    ) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE articles
            SET favorites_count = GREATEST(favorites_count + $2, 0)
            WHERE id = $1
            RETURNING favorites_count
            ",
        )
        .bind(article_id.into_inner())
        .bind(delta)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        count.ok_or_else(|| DomainError::ArticleNotFound(article_id.to_string()))
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
