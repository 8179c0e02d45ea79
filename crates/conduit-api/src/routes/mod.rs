//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{articles, auth, comments, health, profiles, users};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(profile_routes())
        .merge(article_routes())
        .merge(comment_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(auth::register))
        .route("/login", post(auth::login))
}

/// Current user routes
fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/user",
        get(users::get_current_user).put(users::update_current_user),
    )
}

/// Profile and follow routes
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/:username", get(profiles::get_profile))
        .route(
            "/profiles/:username/follow",
            post(profiles::follow).delete(profiles::unfollow),
        )
}

/// Article routes
fn article_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/articles/feed", get(articles::feed))
        .route(
            "/articles/:slug",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/articles/:slug/favorite",
            post(articles::favorite_article).delete(articles::unfavorite_article),
        )
}

/// Comment routes
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/articles/:slug/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/articles/:slug/comments/:id",
            delete(comments::delete_comment),
        )
}
