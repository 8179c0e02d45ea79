//! Article handlers
//!
//! Listing, feed, CRUD and favorites.

use axum::{
    extract::{Path, State},
    Json,
};
use conduit_service::dto::{
    ArticleEnvelope, ArticleListResponse, CreateArticleRequest, MessageResponse,
    UpdateArticleRequest,
};
use conduit_service::ArticleService;

use crate::extractors::{AuthUser, ListQuery, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List published articles
///
/// GET /api/articles?tag=&author=&favorited=&limit=&offset=
pub async fn list_articles(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    query: ListQuery,
) -> ApiResult<Json<ArticleListResponse>> {
    let service = ArticleService::new(state.service_context());
    let response = service
        .find_all(query.filters, query.page, viewer.user_id())
        .await?;
    Ok(Json(response))
}

/// Articles by followed authors
///
/// GET /api/articles/feed?limit=&offset=
pub async fn feed(
    State(state): State<AppState>,
    auth: AuthUser,
    query: ListQuery,
) -> ApiResult<Json<ArticleListResponse>> {
    let service = ArticleService::new(state.service_context());
    let response = service.feed(auth.user_id, query.page).await?;
    Ok(Json(response))
}

/// Create an article
///
/// POST /api/articles
pub async fn create_article(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateArticleRequest>,
) -> ApiResult<Created<Json<ArticleEnvelope>>> {
    let service = ArticleService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get an article
///
/// GET /api/articles/:slug
pub async fn get_article(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<ArticleEnvelope>> {
    let service = ArticleService::new(state.service_context());
    let response = service.find_one(&slug, viewer.user_id()).await?;
    Ok(Json(response))
}

/// Update an article
///
/// PUT /api/articles/:slug
pub async fn update_article(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateArticleRequest>,
) -> ApiResult<Json<ArticleEnvelope>> {
    let service = ArticleService::new(state.service_context());
    let response = service.update(&slug, auth.user_id, request).await?;
    Ok(Json(response))
}

/// Delete an article
///
/// DELETE /api/articles/:slug
pub async fn delete_article(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let service = ArticleService::new(state.service_context());
    let response = service.remove(&slug, auth.user_id).await?;
    Ok(Json(response))
}

/// Favorite an article
///
/// POST /api/articles/:slug/favorite
pub async fn favorite_article(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<ArticleEnvelope>> {
    let service = ArticleService::new(state.service_context());
    let response = service.favorite(&slug, auth.user_id).await?;
    Ok(Json(response))
}

/// Unfavorite an article
///
/// DELETE /api/articles/:slug/favorite
pub async fn unfavorite_article(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<ArticleEnvelope>> {
    let service = ArticleService::new(state.service_context());
    let response = service.unfavorite(&slug, auth.user_id).await?;
    Ok(Json(response))
}
