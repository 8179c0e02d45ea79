//! PostgreSQL implementation of ArticleRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use conduit_core::entities::Article;
use conduit_core::traits::{ArticlePage, ArticleQuery, ArticleRepository, RepoResult};

use crate::mappers::ARTICLE_COLUMNS;
use crate::models::ArticleModel;

use super::error::{escape_like, map_db_error};

/// PostgreSQL implementation of ArticleRepository
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    /// Create a new PgArticleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause shared by the page and count queries
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ArticleQuery) {
    builder.push(" WHERE NOT a.is_draft");

    if let Some(tag) = &query.tag {
        builder
            .push(" AND a.tag_list LIKE ")
            .push_bind(format!("%{}%", escape_like(tag)));
    }

    if let Some(author) = &query.author {
        builder
            .push(" AND a.author_id = (SELECT u.id FROM users u WHERE u.username = ")
            .push_bind(author.clone())
            .push(")");
    }

    if let Some(favorited_by) = &query.favorited_by {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM favorites f JOIN users fu ON fu.id = f.user_id \
                 WHERE f.article_id = a.id AND fu.username = ",
            )
            .push_bind(favorited_by.clone())
            .push(")");
    }

    if let Some(follower) = query.followed_by {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM follows fo \
                 WHERE fo.following_id = a.author_id AND fo.follower_id = ",
            )
            .push_bind(follower.into_inner())
            .push(")");
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Article>> {
        let result = sqlx::query_as::<_, ArticleModel>(
            r"
            SELECT id, slug, title, description, body, tag_list, author_id,
                   favorites_count, is_draft, created_at, updated_at
            FROM articles
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Article::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: ArticleQuery) -> RepoResult<ArticlePage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles a");
        push_filters(&mut count, &query);

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut page = QueryBuilder::<Postgres>::new("SELECT ");
        for (i, column) in ARTICLE_COLUMNS.split(',').enumerate() {
            if i > 0 {
                page.push(", ");
            }
            page.push("a.").push(column.trim());
        }
        page.push(" FROM articles a");
        push_filters(&mut page, &query);
        page.push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let rows = page
            .build_query_as::<ArticleModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ArticlePage {
            articles: rows.into_iter().map(Article::from).collect(),
            total,
        })
    }
}
