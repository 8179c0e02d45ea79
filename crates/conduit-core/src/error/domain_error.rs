//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::CommentId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found")]
    UserNotFound(String),

    #[error("Article not found")]
    ArticleNotFound(String),

    #[error("Comment not found")]
    CommentNotFound(CommentId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("{0}")]
    ValidationError(String),

    #[error("Password confirmation is required when updating password")]
    PasswordConfirmationMissing,

    #[error("Password and confirmation password do not match")]
    PasswordConfirmationMismatch,

    #[error("New password must be different from current password")]
    PasswordUnchanged,

    #[error("Tag relation error: {0}")]
    TagRelation(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You can only update your own articles")]
    NotArticleAuthorUpdate,

    #[error("You can only delete your own articles")]
    NotArticleAuthorDelete,

    #[error("Not allowed")]
    NotCommentAuthor,

    #[error("You cannot follow yourself")]
    CannotFollowSelf,

    // Creating an article whose title slug is taken is refused, not a conflict
    #[error("Article with this title already exists")]
    ArticleTitleTaken,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("An article with this title already exists")]
    SlugTaken,

    #[error("You have already favorited this article")]
    AlreadyFavorited,

    #[error("You have not favorited this article")]
    NotFavorited,

    #[error("You are already following this user")]
    AlreadyFollowing,

    #[error("You are not following this user")]
    NotFollowing,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ArticleNotFound(_) => "UNKNOWN_ARTICLE",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::PasswordConfirmationMissing => "PASSWORD_CONFIRMATION_REQUIRED",
            Self::PasswordConfirmationMismatch => "PASSWORD_CONFIRMATION_MISMATCH",
            Self::PasswordUnchanged => "PASSWORD_UNCHANGED",
            Self::TagRelation(_) => "TAG_RELATION_ERROR",

            // Authorization
            Self::NotArticleAuthorUpdate | Self::NotArticleAuthorDelete => "NOT_ARTICLE_AUTHOR",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::ArticleTitleTaken => "ARTICLE_TITLE_TAKEN",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::SlugTaken => "SLUG_TAKEN",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::NotFavorited => "NOT_FAVORITED",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::NotFollowing => "NOT_FOLLOWING",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ArticleNotFound(_) | Self::CommentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::PasswordConfirmationMissing
                | Self::PasswordConfirmationMismatch
                | Self::PasswordUnchanged
                | Self::TagRelation(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotArticleAuthorUpdate
                | Self::NotArticleAuthorDelete
                | Self::NotCommentAuthor
                | Self::CannotFollowSelf
                | Self::ArticleTitleTaken
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken
                | Self::EmailTaken
                | Self::SlugTaken
                | Self::AlreadyFavorited
                | Self::NotFavorited
                | Self::AlreadyFollowing
                | Self::NotFollowing
        )
    }
}
