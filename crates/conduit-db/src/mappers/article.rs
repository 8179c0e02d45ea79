//! Article and tag model -> entity mappers

use conduit_core::entities::{Article, Tag};
use conduit_core::value_objects::{ArticleId, TagId, TagList, UserId};

use crate::models::{ArticleModel, TagModel};

/// Columns selected into an [`ArticleModel`]
pub const ARTICLE_COLUMNS: &str = "id, slug, title, description, body, tag_list, author_id, \
     favorites_count, is_draft, created_at, updated_at";

impl From<ArticleModel> for Article {
    fn from(model: ArticleModel) -> Self {
        Article {
            id: ArticleId::new(model.id),
            slug: model.slug,
            title: model.title,
            description: model.description,
            body: model.body,
            tag_list: TagList::from_column(&model.tag_list),
            author_id: UserId::new(model.author_id),
            favorites_count: model.favorites_count,
            is_draft: model.is_draft,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<TagModel> for Tag {
    fn from(model: TagModel) -> Self {
        Tag {
            id: TagId::new(model.id),
            name: model.name,
            slug: model.slug,
        }
    }
}
