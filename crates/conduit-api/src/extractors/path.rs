//! Path parameter extractors

use conduit_core::CommentId;
use serde::Deserialize;

use crate::response::ApiError;

/// Path parameters of `/articles/:slug/comments/:id`
#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub slug: String,
    pub id: String,
}

impl CommentPath {
    /// Parse the comment id
    pub fn comment_id(&self) -> Result<CommentId, ApiError> {
        self.id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid comment id format"))
    }
}
