//! Test fixtures and data generators
//!
//! Provides reusable request bodies for both the service suites and the
//! HTTP suites.

use std::sync::atomic::{AtomicU64, Ordering};

use conduit_service::dto::{
    CreateArticleRequest, CreateCommentRequest, LoginRequest, RegisterRequest,
    UpdateArticleRequest,
};
use serde::Serialize;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub const TEST_PASSWORD: &str = "hunter22";

/// Registration with a unique username and email
pub fn register_request() -> RegisterRequest {
    let suffix = unique_suffix();
    RegisterRequest {
        username: format!("user{suffix}"),
        email: format!("user{suffix}@example.com"),
        password: TEST_PASSWORD.to_string(),
        name: None,
    }
}

pub fn login_request(registration: &RegisterRequest) -> LoginRequest {
    LoginRequest {
        username: registration.username.clone(),
        password: registration.password.clone(),
    }
}

/// A published article with the given title and tags
pub fn article_request(title: &str, tags: &[&str]) -> CreateArticleRequest {
    CreateArticleRequest {
        title: title.to_string(),
        description: Some(format!("About {title}")),
        body: format!("Body of {title}"),
        tag_list: Some(tags.iter().map(|t| (*t).to_string()).collect()),
        is_draft: Some(false),
    }
}

/// A draft article with the given title
pub fn draft_request(title: &str) -> CreateArticleRequest {
    CreateArticleRequest {
        is_draft: Some(true),
        ..article_request(title, &[])
    }
}

pub fn retitle_request(title: &str) -> UpdateArticleRequest {
    UpdateArticleRequest {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

pub fn comment_request(body: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        body: body.to_string(),
    }
}

/// Registration body as sent over HTTP
#[derive(Debug, Clone, Serialize)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterBody {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("http{suffix}"),
            email: format!("http{suffix}@example.com"),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Login body as sent over HTTP
#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

impl LoginBody {
    pub fn from_register(registration: &RegisterBody) -> Self {
        Self {
            username: registration.username.clone(),
            password: registration.password.clone(),
        }
    }
}
