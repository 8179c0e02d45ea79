//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in conduit-core.
//! Each repository handles database reads for a specific domain entity; the
//! unit of work owns every multi-row write.

mod article;
mod comment;
mod error;
mod favorite;
mod follow;
mod unit_of_work;
mod user;

pub use article::PgArticleRepository;
pub use comment::PgCommentRepository;
pub use favorite::PgFavoriteRepository;
pub use follow::PgFollowRepository;
pub use unit_of_work::{PgTransaction, PgUnitOfWork};
pub use user::PgUserRepository;
