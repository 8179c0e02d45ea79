//! Tag entity

use crate::value_objects::TagId;

/// A tag, created lazily the first time an article uses its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}
