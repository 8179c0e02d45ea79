//! User service
//!
//! Handles the current user's account, public profiles and the follow graph.

use conduit_core::{DomainError, User, UserChanges, UserId};
use tracing::{info, instrument};

use crate::dto::{ProfileEnvelope, ProfileResponse, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get current authenticated user
    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: UserId) -> ServiceResult<UserResponse> {
        let user = self.get_user_entity(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Get user entity by ID
    #[instrument(skip(self))]
    pub async fn get_user_entity(&self, user_id: UserId) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?)
    }

    /// Update current user
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: UserId,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let user = self.get_user_entity(user_id).await?;

        let mut changes = UserChanges {
            name: request.name,
            bio: request.bio,
            image: request.image,
            ..Default::default()
        };

        if let Some(password) = request.password {
            let confirm = request
                .confirm_password
                .ok_or(DomainError::PasswordConfirmationMissing)?;
            if confirm != password {
                return Err(DomainError::PasswordConfirmationMismatch.into());
            }

            let current_hash = self.ctx.user_repo().get_password_hash(user_id).await?;
            if let Some(hash) = current_hash {
                if self.ctx.password_service().verify(&password, &hash)? {
                    return Err(DomainError::PasswordUnchanged.into());
                }
            }

            changes.password_hash = Some(self.ctx.password_service().hash(&password)?);
        }

        if let Some(username) = request.username.filter(|u| *u != user.username) {
            if let Some(other) = self.ctx.user_repo().find_by_username(&username).await? {
                if other.id != user_id {
                    return Err(DomainError::UsernameTaken.into());
                }
            }
            changes.username = Some(username);
        }

        if let Some(email) = request.email.filter(|e| *e != user.email) {
            if let Some(other) = self.ctx.user_repo().find_by_email(&email).await? {
                if other.id != user_id {
                    return Err(DomainError::EmailTaken.into());
                }
            }
            changes.email = Some(email);
        }

        if changes.is_empty() {
            return Ok(UserResponse::from(&user));
        }

        let updated = self.ctx.user_repo().update(user_id, changes).await?;
        info!(user_id = %user_id, "User profile updated");

        Ok(UserResponse::from(&updated))
    }

    /// Get a public profile as seen by `viewer`
    #[instrument(skip(self))]
    pub async fn get_user_profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
    ) -> ServiceResult<ProfileEnvelope> {
        let user = self.find_by_username(username).await?;

        let following = match viewer {
            Some(viewer) if !user.is(Some(viewer)) => {
                self.ctx.follow_repo().exists(viewer, user.id).await?
            }
            _ => false,
        };

        Ok(ProfileEnvelope {
            profile: ProfileResponse::new(&user, following),
        })
    }

    /// Follow another user
    #[instrument(skip(self))]
    pub async fn follow_user(
        &self,
        current_user: UserId,
        username: &str,
    ) -> ServiceResult<ProfileEnvelope> {
        let target = self.find_by_username(username).await?;
        if target.is(Some(current_user)) {
            return Err(DomainError::CannotFollowSelf.into());
        }

        if self.ctx.follow_repo().exists(current_user, target.id).await? {
            return Err(DomainError::AlreadyFollowing.into());
        }
        self.ctx.follow_repo().create(current_user, target.id).await?;

        info!(follower = %current_user, following = %target.id, "Follow created");

        Ok(ProfileEnvelope {
            profile: ProfileResponse::new(&target, true),
        })
    }

    /// Stop following another user
    #[instrument(skip(self))]
    pub async fn unfollow_user(
        &self,
        current_user: UserId,
        username: &str,
    ) -> ServiceResult<ProfileEnvelope> {
        let target = self.find_by_username(username).await?;
        if target.is(Some(current_user)) {
            return Err(DomainError::CannotFollowSelf.into());
        }

        if !self.ctx.follow_repo().delete(current_user, target.id).await? {
            return Err(DomainError::NotFollowing.into());
        }

        info!(follower = %current_user, following = %target.id, "Follow removed");

        Ok(ProfileEnvelope {
            profile: ProfileResponse::new(&target, false),
        })
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?)
    }
}
