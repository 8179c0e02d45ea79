//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and listing queries.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use pagination::ListQuery;
pub use path::CommentPath;
pub use validated::ValidatedJson;
