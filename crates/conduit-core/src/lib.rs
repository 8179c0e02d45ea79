//! # conduit-core
//!
//! Domain layer containing entities, value objects and repository ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Article, Comment, NewArticle, NewComment, NewUser, Tag, User, UserChanges};
pub use error::DomainError;
pub use traits::{
    ArticlePage, ArticleQuery, ArticleRepository, Clock, CommentRepository, FavoriteRepository,
    FollowRepository, RepoResult, SystemClock, Transaction, UnitOfWork, UserRepository,
};
pub use value_objects::{
    slugify_title, suffixed_slug, tag_slug, ArticleId, CommentId, IdParseError, TagId, TagList,
    UserId,
};
