//! User handlers
//!
//! Endpoints for the authenticated user's own account.

use axum::{extract::State, Json};
use conduit_service::dto::{StatusResponse, UpdateUserRequest, UserResponse};
use conduit_service::UserService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get current user
///
/// GET /api/user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StatusResponse<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.current_user(auth.user_id).await?;
    Ok(Json(StatusResponse::success(
        "User retrieved successfully",
        response,
    )))
}

/// Update current user
///
/// PUT /api/user
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<StatusResponse<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.update_user(auth.user_id, request).await?;
    Ok(Json(StatusResponse::success(
        "User updated successfully",
        response,
    )))
}
