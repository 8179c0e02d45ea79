//! Authentication extractor
//!
//! Extracts the bearer token from the Authorization header and resolves it
//! to a stored user.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::{TypedHeaderRejection, TypedHeaderRejectionReason},
    TypedHeader,
};
use conduit_core::UserId;
use conduit_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from a valid token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// ID of the user the token was issued for
    pub user_id: UserId,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    async fn from_bearer(token: &str, state: &AppState) -> Result<Self, ApiError> {
        let user = AuthService::new(state.service_context())
            .authenticate(token)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected bearer token");
                ApiError::from(e)
            })?;

        Ok(Self::new(user.id))
    }
}

fn is_missing(rejection: &TypedHeaderRejection) -> bool {
    matches!(rejection.reason(), TypedHeaderRejectionReason::Missing)
}

fn rejection_to_error(rejection: &TypedHeaderRejection) -> ApiError {
    if is_missing(rejection) {
        ApiError::MissingAuth
    } else {
        ApiError::InvalidAuthFormat
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| rejection_to_error(&e))?;

        let app_state = AppState::from_ref(state);
        AuthUser::from_bearer(bearer.token(), &app_state).await
    }
}

/// Optional authenticated user
///
/// `None` when no Authorization header is present. A header that is present
/// but malformed, expired or otherwise invalid is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    /// ID of the viewer, if any
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                let user = AuthUser::from_bearer(bearer.token(), &app_state).await?;
                Ok(OptionalAuthUser(Some(user)))
            }
            Err(e) if is_missing(&e) => Ok(OptionalAuthUser(None)),
            Err(e) => Err(rejection_to_error(&e)),
        }
    }
}
