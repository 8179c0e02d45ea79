//! Comment model -> entity mapper

use conduit_core::entities::Comment;
use conduit_core::value_objects::{ArticleId, CommentId, UserId};

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: CommentId::new(model.id),
            body: model.body,
            article_id: ArticleId::new(model.article_id),
            author_id: UserId::new(model.author_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
