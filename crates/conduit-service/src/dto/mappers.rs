//! Entity to DTO mappers
//!
//! Implements conversions from domain entities to response DTOs. Views that
//! depend on the viewer (`following`, `favorited`) take those flags explicitly.

use conduit_core::{Article, Comment, User};

use super::responses::{ArticleResponse, CommentResponse, ProfileResponse, UserResponse};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl ProfileResponse {
    pub fn new(user: &User, following: bool) -> Self {
        Self {
            username: user.username.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
            following,
        }
    }
}

// ============================================================================
// Article Mappers
// ============================================================================

impl ArticleResponse {
    pub fn new(article: Article, author: ProfileResponse, favorited: bool) -> Self {
        Self {
            id: article.id,
            slug: article.slug,
            title: article.title,
            description: article.description,
            body: article.body,
            tag_list: article.tag_list.into_vec(),
            author_id: article.author_id,
            favorites_count: article.favorites_count,
            favorited,
            is_draft: article.is_draft,
            created_at: article.created_at,
            updated_at: article.updated_at,
            author,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl CommentResponse {
    pub fn new(comment: Comment, author: ProfileResponse) -> Self {
        Self {
            id: comment.id,
            body: comment.body,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author,
        }
    }
}
