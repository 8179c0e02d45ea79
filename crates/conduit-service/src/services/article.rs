//! Article service
//!
//! Creation, listing, feeds, updates, deletion and favorites. Every write that
//! touches more than one row runs inside a single [`Transaction`].

use std::collections::{HashMap, HashSet};

use conduit_core::{
    slugify_title, suffixed_slug, tag_slug, Article, ArticlePage, ArticleQuery, DomainError,
    NewArticle, TagList, Transaction, User, UserId,
};
use tracing::{debug, info, instrument};

use crate::dto::{
    ArticleEnvelope, ArticleFilters, ArticleListResponse, ArticleResponse, CreateArticleRequest,
    MessageResponse, Pagination, ProfileResponse, UpdateArticleRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Article service
pub struct ArticleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ArticleService<'a> {
    /// Create a new ArticleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an article owned by `author_id`
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(
        &self,
        author_id: UserId,
        request: CreateArticleRequest,
    ) -> ServiceResult<ArticleEnvelope> {
        let slug = slugify_title(&request.title)?;
        if self.ctx.article_repo().find_by_slug(&slug).await?.is_some() {
            return Err(DomainError::ArticleTitleTaken.into());
        }

        let tag_list = TagList::normalize(request.tag_list.unwrap_or_default())?;

        let mut tx = self.ctx.unit_of_work().begin().await?;
        let article = tx
            .insert_article(NewArticle {
                slug,
                title: request.title,
                description: request.description.unwrap_or_default(),
                body: request.body,
                tag_list,
                author_id,
                is_draft: request.is_draft.unwrap_or(true),
                created_at: self.ctx.now(),
            })
            .await
            .map_err(|e| match e {
                // Lost a race with another insert of the same title
                DomainError::SlugTaken => DomainError::ArticleTitleTaken,
                other => other,
            })?;
        link_tags(tx.as_mut(), &article).await?;
        tx.commit().await?;

        info!(article_id = %article.id, slug = %article.slug, "Article created");

        self.envelope(article, Some(author_id)).await
    }

    /// List published articles matching `filters`, newest first
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        filters: ArticleFilters,
        page: Pagination,
        viewer: Option<UserId>,
    ) -> ServiceResult<ArticleListResponse> {
        let result = self
            .ctx
            .article_repo()
            .list(ArticleQuery {
                tag: filters.tag,
                author: filters.author,
                favorited_by: filters.favorited,
                followed_by: None,
                limit: page.limit,
                offset: page.offset,
            })
            .await?;

        self.render_page(result, viewer, false).await
    }

    /// Published articles written by users `user_id` follows
    #[instrument(skip(self))]
    pub async fn feed(
        &self,
        user_id: UserId,
        page: Pagination,
    ) -> ServiceResult<ArticleListResponse> {
        let result = self
            .ctx
            .article_repo()
            .list(ArticleQuery {
                followed_by: Some(user_id),
                limit: page.limit,
                offset: page.offset,
                ..Default::default()
            })
            .await?;

        self.render_page(result, Some(user_id), true).await
    }

    /// Get one article by slug
    #[instrument(skip(self))]
    pub async fn find_one(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> ServiceResult<ArticleEnvelope> {
        let article = self.find_visible(slug, viewer).await?;
        self.envelope(article, viewer).await
    }

    /// Update an article. Only its author may do so.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        slug: &str,
        user_id: UserId,
        request: UpdateArticleRequest,
    ) -> ServiceResult<ArticleEnvelope> {
        let mut article = self.find_visible(slug, Some(user_id)).await?;
        if !article.is_authored_by(user_id) {
            return Err(DomainError::NotArticleAuthorUpdate.into());
        }

        let now = self.ctx.now();

        if let Some(title) = request.title.filter(|t| *t != article.title) {
            let new_slug = suffixed_slug(&title, now.timestamp_millis())?;
            if let Some(existing) = self.ctx.article_repo().find_by_slug(&new_slug).await? {
                if existing.id != article.id {
                    return Err(DomainError::SlugTaken.into());
                }
            }
            debug!(old = %article.slug, new = %new_slug, "Article renamed");
            article.title = title;
            article.slug = new_slug;
        }
        if let Some(description) = request.description {
            article.description = description;
        }
        if let Some(body) = request.body {
            article.body = body;
        }
        if let Some(is_draft) = request.is_draft {
            article.is_draft = is_draft;
        }
        let retag = match request.tag_list {
            Some(tags) => {
                article.tag_list = TagList::normalize(tags)?;
                true
            }
            None => false,
        };
        article.updated_at = now;

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.update_article(&article).await?;
        if retag {
            tx.unlink_tags(article.id).await?;
            link_tags(tx.as_mut(), &article).await?;
        }
        tx.commit().await?;

        info!(article_id = %article.id, slug = %article.slug, "Article updated");

        self.envelope(article, Some(user_id)).await
    }

    /// Delete an article with its comments, tag links and favorites
    #[instrument(skip(self))]
    pub async fn remove(&self, slug: &str, user_id: UserId) -> ServiceResult<MessageResponse> {
        let article = self.find_visible(slug, Some(user_id)).await?;
        if !article.is_authored_by(user_id) {
            return Err(DomainError::NotArticleAuthorDelete.into());
        }

        let mut tx = self.ctx.unit_of_work().begin().await?;
        let comments = tx.delete_comments(article.id).await?;
        let tags = tx.unlink_tags(article.id).await?;
        let favorites = tx.delete_favorites(article.id).await?;
        tx.delete_article(article.id).await?;
        tx.commit().await?;

        info!(
            article_id = %article.id,
            comments,
            tags,
            favorites,
            "Article deleted"
        );

        Ok(MessageResponse::new("Article deleted successfully"))
    }

    /// Mark an article as favorited by `user_id`
    #[instrument(skip(self))]
    pub async fn favorite(&self, slug: &str, user_id: UserId) -> ServiceResult<ArticleEnvelope> {
        let mut article = self.find_visible(slug, Some(user_id)).await?;
        if self.ctx.favorite_repo().exists(user_id, article.id).await? {
            return Err(DomainError::AlreadyFavorited.into());
        }

        let mut tx = self.ctx.unit_of_work().begin().await?;
        tx.insert_favorite(user_id, article.id).await?;
        article.favorites_count = tx.adjust_favorites_count(article.id, 1).await?;
        tx.commit().await?;

        info!(article_id = %article.id, user_id = %user_id, "Favorite added");

        self.envelope(article, Some(user_id)).await
    }

    /// Remove `user_id`'s favorite from an article
    #[instrument(skip(self))]
    pub async fn unfavorite(&self, slug: &str, user_id: UserId) -> ServiceResult<ArticleEnvelope> {
        let mut article = self.find_visible(slug, Some(user_id)).await?;
        if !self.ctx.favorite_repo().exists(user_id, article.id).await? {
            return Err(DomainError::NotFavorited.into());
        }

        let mut tx = self.ctx.unit_of_work().begin().await?;
        if !tx.delete_favorite(user_id, article.id).await? {
            return Err(DomainError::NotFavorited.into());
        }
        article.favorites_count = tx.adjust_favorites_count(article.id, -1).await?;
        tx.commit().await?;

        info!(article_id = %article.id, user_id = %user_id, "Favorite removed");

        self.envelope(article, Some(user_id)).await
    }

    /// Look up an article by slug, hiding drafts from everyone but their author
    pub(crate) async fn find_visible(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> ServiceResult<Article> {
        match self.ctx.article_repo().find_by_slug(slug).await? {
            Some(article) if article.is_visible_to(viewer) => Ok(article),
            _ => Err(DomainError::ArticleNotFound(slug.to_string()).into()),
        }
    }

    async fn envelope(
        &self,
        article: Article,
        viewer: Option<UserId>,
    ) -> ServiceResult<ArticleEnvelope> {
        let author = self
            .ctx
            .user_repo()
            .find_by_id(article.author_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(article.author_id.to_string()))?;

        let (following, favorited) = match viewer {
            Some(viewer) => {
                let following = !author.is(Some(viewer))
                    && self.ctx.follow_repo().exists(viewer, author.id).await?;
                let favorited = self.ctx.favorite_repo().exists(viewer, article.id).await?;
                (following, favorited)
            }
            None => (false, false),
        };

        Ok(ArticleEnvelope {
            article: ArticleResponse::new(
                article,
                ProfileResponse::new(&author, following),
                favorited,
            ),
        })
    }

    /// Shape a page with one batched lookup each for authors, follows and favorites
    async fn render_page(
        &self,
        page: ArticlePage,
        viewer: Option<UserId>,
        all_followed: bool,
    ) -> ServiceResult<ArticleListResponse> {
        let mut author_ids: Vec<UserId> = page.articles.iter().map(|a| a.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<UserId, User> = self
            .ctx
            .user_repo()
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let (following, favorited) = match viewer {
            Some(viewer) => {
                let article_ids: Vec<_> = page.articles.iter().map(|a| a.id).collect();
                let following = if all_followed {
                    author_ids.iter().copied().collect()
                } else {
                    self.ctx
                        .follow_repo()
                        .following_among(viewer, &author_ids)
                        .await?
                };
                let favorited = self
                    .ctx
                    .favorite_repo()
                    .favorited_among(viewer, &article_ids)
                    .await?;
                (following, favorited)
            }
            None => (HashSet::new(), HashSet::new()),
        };

        let mut articles = Vec::with_capacity(page.articles.len());
        for article in page.articles {
            let author = authors
                .get(&article.author_id)
                .ok_or_else(|| DomainError::UserNotFound(article.author_id.to_string()))?;
            let is_following = !author.is(viewer) && following.contains(&author.id);
            let is_favorited = favorited.contains(&article.id);

            articles.push(ArticleResponse::new(
                article,
                ProfileResponse::new(author, is_following),
                is_favorited,
            ));
        }

        Ok(ArticleListResponse {
            articles,
            articles_count: page.total,
        })
    }
}

/// Link every tag of `article`, creating tags that do not exist yet
async fn link_tags<T>(tx: &mut T, article: &Article) -> ServiceResult<()>
where
    T: Transaction + ?Sized,
{
    for name in article.tag_list.iter() {
        let tag = match tx.find_tag_by_name(name).await? {
            Some(tag) => tag,
            None => tx.insert_tag(name, &tag_slug(name)).await?,
        };
        tx.link_tag(article.id, tag.id).await?;
    }
    Ok(())
}
