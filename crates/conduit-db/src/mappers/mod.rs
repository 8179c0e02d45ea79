//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions turning database rows into domain
//! objects, plus the column list used by dynamically built article queries.

mod article;
mod comment;
mod user;

pub use article::ARTICLE_COLUMNS;
