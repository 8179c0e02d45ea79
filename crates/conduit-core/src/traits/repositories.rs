//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Reads go through the per-entity repositories;
//! every write that touches more than one row goes through a [`Transaction`]
//! obtained from the [`UnitOfWork`].

use std::collections::HashSet;

use async_trait::async_trait;

use crate::entities::{Article, Comment, NewArticle, NewComment, NewUser, Tag, User, UserChanges};
use crate::error::DomainError;
use crate::value_objects::{ArticleId, CommentId, TagId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find several users at once; missing ids are skipped
    async fn find_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<User>>;

    /// Find user by username (exact match)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Create a new user.
    ///
    /// Unique violations surface as `UsernameTaken` / `EmailTaken`.
    async fn create(&self, user: NewUser) -> RepoResult<User>;

    /// Update an existing user and return the stored row
    async fn update(&self, id: UserId, changes: UserChanges) -> RepoResult<User>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Whether `follower` follows `following`
    async fn exists(&self, follower: UserId, following: UserId) -> RepoResult<bool>;

    /// The subset of `candidates` that `follower` follows
    async fn following_among(
        &self,
        follower: UserId,
        candidates: &[UserId],
    ) -> RepoResult<HashSet<UserId>>;

    /// Insert a follow edge. An existing edge is `AlreadyFollowing`.
    async fn create(&self, follower: UserId, following: UserId) -> RepoResult<()>;

    /// Delete a follow edge, returning whether one existed
    async fn delete(&self, follower: UserId, following: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Article Repository
// ============================================================================

/// Filters and pagination for article listings.
///
/// All filters are combined with AND. Drafts are never listed.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    /// Substring of the cached tag list
    pub tag: Option<String>,
    /// Username of the author
    pub author: Option<String>,
    /// Username of a user who favorited the article
    pub favorited_by: Option<String>,
    /// Restrict to authors followed by this user (the feed)
    pub followed_by: Option<UserId>,
    pub limit: i64,
    pub offset: i64,
}

/// A page of articles plus the number of rows matching the filters,
/// regardless of limit and offset
#[derive(Debug, Clone, Default)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: i64,
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Find article by slug (drafts included)
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Article>>;

    /// List published articles, newest first
    async fn list(&self, query: ArticleQuery) -> RepoResult<ArticlePage>;
}

// ============================================================================
// Favorite Repository
// ============================================================================

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Whether `user` favorited `article`
    async fn exists(&self, user: UserId, article: ArticleId) -> RepoResult<bool>;

    /// The subset of `articles` that `user` favorited
    async fn favorited_among(
        &self,
        user: UserId,
        articles: &[ArticleId],
    ) -> RepoResult<HashSet<ArticleId>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>>;

    /// All comments on an article, oldest first
    async fn find_by_article(&self, article_id: ArticleId) -> RepoResult<Vec<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: NewComment) -> RepoResult<Comment>;

    /// Delete a comment
    async fn delete(&self, id: CommentId) -> RepoResult<()>;
}

// ============================================================================
// Unit of Work
// ============================================================================

/// Entry point for atomic multi-statement writes
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

/// An open transaction.
///
/// Nothing written through it is visible to other readers until [`commit`]
/// succeeds. Dropping it without committing rolls every write back.
///
/// [`commit`]: Transaction::commit
#[async_trait]
pub trait Transaction: Send {
    /// Insert an article. A taken slug is `SlugTaken`.
    async fn insert_article(&mut self, article: NewArticle) -> RepoResult<Article>;

    /// Overwrite the mutable columns of an article. A taken slug is `SlugTaken`.
    async fn update_article(&mut self, article: &Article) -> RepoResult<()>;

    /// Delete the article row
    async fn delete_article(&mut self, id: ArticleId) -> RepoResult<()>;

    /// Find a tag by exact name
    async fn find_tag_by_name(&mut self, name: &str) -> RepoResult<Option<Tag>>;

    /// Insert a tag
    async fn insert_tag(&mut self, name: &str, slug: &str) -> RepoResult<Tag>;

    /// Link an article to a tag
    async fn link_tag(&mut self, article_id: ArticleId, tag_id: TagId) -> RepoResult<()>;

    /// Remove every tag link of an article, returning how many were removed
    async fn unlink_tags(&mut self, article_id: ArticleId) -> RepoResult<u64>;

    /// Insert a favorite row. An existing row is `AlreadyFavorited`.
    async fn insert_favorite(&mut self, user: UserId, article: ArticleId) -> RepoResult<()>;

    /// Delete a favorite row, returning whether one existed
    async fn delete_favorite(&mut self, user: UserId, article: ArticleId) -> RepoResult<bool>;

    /// Remove every favorite of an article
    async fn delete_favorites(&mut self, article_id: ArticleId) -> RepoResult<u64>;

    /// Remove every comment of an article
    async fn delete_comments(&mut self, article_id: ArticleId) -> RepoResult<u64>;

    /// Add `delta` to the cached favorites counter, never going below zero.
    /// Returns the new value.
    async fn adjust_favorites_count(&mut self, article_id: ArticleId, delta: i64)
        -> RepoResult<i64>;

    /// Make every write visible
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
