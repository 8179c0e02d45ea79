//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Bodies are read unwrapped and use camelCase keys.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::services::{ServiceError, ServiceResult};

/// Longest accepted tag name after trimming
const MAX_TAG_LENGTH: usize = 50;

/// Page size used when the caller gives none
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page size a caller may ask for
pub const MAX_PAGE_LIMIT: i64 = 100;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 4, max = 20, message = "Password must be 4-20 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 45, message = "Name must be 1-45 characters"))]
    pub name: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user request. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 45, message = "Name must be 1-45 characters"))]
    pub name: Option<String>,

    pub bio: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[validate(length(min = 4, max = 20, message = "Password must be 4-20 characters"))]
    pub password: Option<String>,

    pub confirm_password: Option<String>,
}

// ============================================================================
// Article Requests
// ============================================================================

/// Create article request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,

    #[validate(custom(function = "validate_tag_names"))]
    pub tag_list: Option<Vec<String>>,

    /// Defaults to a draft when omitted
    pub is_draft: Option<bool>,
}

/// Update article request. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Body cannot be empty"))]
    pub body: Option<String>,

    /// Replaces every tag of the article; an empty list clears them
    #[validate(custom(function = "validate_tag_names"))]
    pub tag_list: Option<Vec<String>>,

    pub is_draft: Option<bool>,
}

/// Query string of article listings and the feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListArticlesQuery {
    /// Split into listing filters and a checked page window
    pub fn into_parts(self) -> ServiceResult<(ArticleFilters, Pagination)> {
        let page = Pagination::new(self.limit, self.offset)?;
        let filters = ArticleFilters {
            tag: self.tag,
            author: self.author,
            favorited: self.favorited,
        };
        Ok((filters, page))
    }
}

/// Optional listing filters, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilters {
    /// Substring of the tag list
    pub tag: Option<String>,
    /// Author username
    pub author: Option<String>,
    /// Username of a user who favorited the article
    pub favorited: Option<String>,
}

/// Limit/offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Apply defaults and bounds. The limit is clamped to `1..=MAX_PAGE_LIMIT`,
    /// a negative offset is rejected.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> ServiceResult<Self> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(ServiceError::validation("offset must not be negative"));
        }
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);

        Ok(Self { limit, offset })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment body is required"))]
    pub body: String,
}

// Blank names are allowed here; they are dropped during normalization.
fn validate_tag_names(tags: &[String]) -> Result<(), ValidationError> {
    if tags
        .iter()
        .any(|tag| tag.trim().chars().count() > MAX_TAG_LENGTH)
    {
        let mut err = ValidationError::new("tag_length");
        err.message = Some(format!("Each tag must be at most {MAX_TAG_LENGTH} characters").into());
        return Err(err);
    }
    Ok(())
}
