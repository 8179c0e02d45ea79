//! Value objects - immutable types that represent domain concepts

mod ids;
mod slug;
mod tag_list;

pub use ids::{ArticleId, CommentId, IdParseError, TagId, UserId};
pub use slug::{slugify_title, suffixed_slug, tag_slug};
pub use tag_list::TagList;
