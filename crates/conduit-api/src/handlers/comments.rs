//! Comment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use conduit_service::dto::{
    CommentEnvelope, CommentListResponse, CreateCommentRequest, MessageResponse,
};
use conduit_service::CommentService;

use crate::extractors::{AuthUser, CommentPath, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List comments of an article
///
/// GET /api/articles/:slug/comments
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<CommentListResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service.find_all(&slug, viewer.user_id()).await?;
    Ok(Json(response))
}

/// Comment on an article
///
/// POST /api/articles/:slug/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentEnvelope>>> {
    let service = CommentService::new(state.service_context());
    let response = service.create(&slug, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Delete a comment
///
/// DELETE /api/articles/:slug/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentPath>,
) -> ApiResult<Json<MessageResponse>> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    let response = service
        .remove(&path.slug, comment_id, auth.user_id)
        .await?;
    Ok(Json(response))
}
