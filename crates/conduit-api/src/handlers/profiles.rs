//! Profile handlers
//!
//! Public profiles and the follow graph.

use axum::{
    extract::{Path, State},
    Json,
};
use conduit_service::dto::ProfileEnvelope;
use conduit_service::UserService;

use crate::extractors::{AuthUser, OptionalAuthUser};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get a profile
///
/// GET /api/profiles/:username
pub async fn get_profile(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileEnvelope>> {
    let service = UserService::new(state.service_context());
    let response = service
        .get_user_profile(&username, viewer.user_id())
        .await?;
    Ok(Json(response))
}

/// Follow a user
///
/// POST /api/profiles/:username/follow
pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileEnvelope>> {
    let service = UserService::new(state.service_context());
    let response = service.follow_user(auth.user_id, &username).await?;
    Ok(Json(response))
}

/// Unfollow a user
///
/// DELETE /api/profiles/:username/follow
pub async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileEnvelope>> {
    let service = UserService::new(state.service_context());
    let response = service.unfollow_user(auth.user_id, &username).await?;
    Ok(Json(response))
}
