//! Service context - dependency container for services
//!
//! Holds all repositories, the unit of work, and the auth primitives needed by services.

use std::sync::Arc;

use conduit_common::auth::{JwtService, PasswordService};
use conduit_core::traits::{
    ArticleRepository, Clock, CommentRepository, FavoriteRepository, FollowRepository,
    UnitOfWork, UserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories for reads
/// - The unit of work for atomic writes
/// - JWT and password services for authentication
/// - The clock used for timestamps
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    article_repo: Arc<dyn ArticleRepository>,
    favorite_repo: Arc<dyn FavoriteRepository>,
    comment_repo: Arc<dyn CommentRepository>,

    // Transactions
    unit_of_work: Arc<dyn UnitOfWork>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    clock: Arc<dyn Clock>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        follow_repo: Arc<dyn FollowRepository>,
        article_repo: Arc<dyn ArticleRepository>,
        favorite_repo: Arc<dyn FavoriteRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
        jwt_service: Arc<JwtService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            follow_repo,
            article_repo,
            favorite_repo,
            comment_repo,
            unit_of_work,
            jwt_service,
            password_service: PasswordService::new(),
            clock,
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the follow repository
    pub fn follow_repo(&self) -> &dyn FollowRepository {
        self.follow_repo.as_ref()
    }

    /// Get the article repository
    pub fn article_repo(&self) -> &dyn ArticleRepository {
        self.article_repo.as_ref()
    }

    /// Get the favorite repository
    pub fn favorite_repo(&self) -> &dyn FavoriteRepository {
        self.favorite_repo.as_ref()
    }

    /// Get the comment repository
    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    /// Get the unit of work
    pub fn unit_of_work(&self) -> &dyn UnitOfWork {
        self.unit_of_work.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    follow_repo: Option<Arc<dyn FollowRepository>>,
    article_repo: Option<Arc<dyn ArticleRepository>>,
    favorite_repo: Option<Arc<dyn FavoriteRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    unit_of_work: Option<Arc<dyn UnitOfWork>>,
    jwt_service: Option<Arc<JwtService>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            follow_repo: None,
            article_repo: None,
            favorite_repo: None,
            comment_repo: None,
            unit_of_work: None,
            jwt_service: None,
            clock: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn follow_repo(mut self, repo: Arc<dyn FollowRepository>) -> Self {
        self.follow_repo = Some(repo);
        self
    }

    pub fn article_repo(mut self, repo: Arc<dyn ArticleRepository>) -> Self {
        self.article_repo = Some(repo);
        self
    }

    pub fn favorite_repo(mut self, repo: Arc<dyn FavoriteRepository>) -> Self {
        self.favorite_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn unit_of_work(mut self, unit_of_work: Arc<dyn UnitOfWork>) -> Self {
        self.unit_of_work = Some(unit_of_work);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo.ok_or_else(|| ServiceError::internal("user_repo is required"))?,
            self.follow_repo.ok_or_else(|| ServiceError::internal("follow_repo is required"))?,
            self.article_repo.ok_or_else(|| ServiceError::internal("article_repo is required"))?,
            self.favorite_repo.ok_or_else(|| ServiceError::internal("favorite_repo is required"))?,
            self.comment_repo.ok_or_else(|| ServiceError::internal("comment_repo is required"))?,
            self.unit_of_work.ok_or_else(|| ServiceError::internal("unit_of_work is required"))?,
            self.jwt_service.ok_or_else(|| ServiceError::internal("jwt_service is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(conduit_core::SystemClock)),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
