//! Authentication handlers
//!
//! Endpoints for user registration and login.

use axum::{extract::State, Json};
use conduit_service::dto::{AuthResponse, LoginRequest, RegisterRequest, StatusResponse};
use conduit_service::AuthService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<StatusResponse<AuthResponse>>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(StatusResponse::success(
        "Registration successful",
        response,
    ))))
}

/// Login with username and password
///
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<StatusResponse<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(StatusResponse::success("Login successful", response)))
}
