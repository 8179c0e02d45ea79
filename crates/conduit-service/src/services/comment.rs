//! Comment service
//!
//! Comments are always addressed through the slug of their article.

use std::collections::{HashMap, HashSet};

use conduit_core::{CommentId, DomainError, NewComment, User, UserId};
use tracing::{info, instrument};

use crate::dto::{
    CommentEnvelope, CommentListResponse, CommentResponse, CreateCommentRequest, MessageResponse,
    ProfileResponse,
};

use super::article::ArticleService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a comment to an article
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        slug: &str,
        author_id: UserId,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentEnvelope> {
        let article = ArticleService::new(self.ctx)
            .find_visible(slug, Some(author_id))
            .await?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(author_id.to_string()))?;

        let comment = self
            .ctx
            .comment_repo()
            .create(NewComment {
                body: request.body,
                article_id: article.id,
                author_id,
                created_at: self.ctx.now(),
            })
            .await?;

        info!(comment_id = %comment.id, article_id = %article.id, "Comment created");

        Ok(CommentEnvelope {
            comment: CommentResponse::new(comment, ProfileResponse::new(&author, false)),
        })
    }

    /// All comments of an article, oldest first
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> ServiceResult<CommentListResponse> {
        let article = ArticleService::new(self.ctx).find_visible(slug, viewer).await?;
        let comments = self.ctx.comment_repo().find_by_article(article.id).await?;

        let mut author_ids: Vec<UserId> = comments.iter().map(|c| c.author_id).collect();
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

        let following = match viewer {
            Some(viewer) => {
                self.ctx
                    .follow_repo()
                    .following_among(viewer, &author_ids)
                    .await?
            }
            None => HashSet::new(),
        };

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = authors
                .get(&comment.author_id)
                .ok_or_else(|| DomainError::UserNotFound(comment.author_id.to_string()))?;
            let is_following = !author.is(viewer) && following.contains(&author.id);
            views.push(CommentResponse::new(
                comment,
                ProfileResponse::new(author, is_following),
            ));
        }

        Ok(CommentListResponse { comments: views })
    }

    /// Delete a comment. Only its author may do so.
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        slug: &str,
        comment_id: CommentId,
        user_id: UserId,
    ) -> ServiceResult<MessageResponse> {
        let article = ArticleService::new(self.ctx)
            .find_visible(slug, Some(user_id))
            .await?;

        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.article_id == article.id)
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        if !comment.is_authored_by(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        self.ctx.comment_repo().delete(comment_id).await?;

        info!(comment_id = %comment_id, article_id = %article.id, "Comment deleted");

        Ok(MessageResponse::new("Comment deleted successfully"))
    }
}
