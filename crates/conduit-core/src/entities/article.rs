//! Article entity - a blog post owned by its author

use chrono::{DateTime, Utc};

use crate::value_objects::{ArticleId, TagList, UserId};

/// A stored article.
///
/// `tag_list` mirrors the article's tag links and is rewritten whenever the
/// links are. `favorites_count` mirrors the number of favorite rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: TagList,
    pub author_id: UserId,
    pub favorites_count: i64,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    #[inline]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Drafts are only visible to their author
    pub fn is_visible_to(&self, viewer: Option<UserId>) -> bool {
        !self.is_draft || viewer.is_some_and(|id| self.is_authored_by(id))
    }
}

/// Data required to insert an article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: TagList,
    pub author_id: UserId,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
}
