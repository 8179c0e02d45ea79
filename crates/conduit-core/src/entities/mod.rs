//! Domain entities - core business objects

mod article;
mod comment;
mod tag;
mod user;

pub use article::{Article, NewArticle};
pub use comment::{Comment, NewComment};
pub use tag::Tag;
pub use user::{NewUser, User, UserChanges};
