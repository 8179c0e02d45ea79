//! Authentication service
//!
//! Handles user registration, login, and bearer token resolution.

use conduit_common::AppError;
use conduit_core::{DomainError, NewUser, User};
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        // Both uniqueness checks run before anything is written
        if self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(DomainError::UsernameTaken.into());
        }
        if self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(DomainError::EmailTaken.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let user = self
            .ctx
            .user_repo()
            .create(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
                name: request.name,
                created_at: self.ctx.now(),
            })
            .await?;

        info!(user_id = %user.id, "User registered successfully");

        self.issue(&user)
    }

    /// Login with username and password
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                warn!(username = %request.username, "Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: invalid password"))?;

        info!(user_id = %user.id, "User logged in successfully");

        self.issue(&user)
    }

    /// Resolve a bearer token to the user it was issued for
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.ctx.jwt_service().decode_token(token)?;
        let user_id = claims.user_id()?;

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Token refers to a missing user");
                ServiceError::App(AppError::InvalidToken)
            })
    }

    fn issue(&self, user: &User) -> ServiceResult<AuthResponse> {
        let token = self.ctx.jwt_service().issue(user.id, &user.username)?;

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
