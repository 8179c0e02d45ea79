//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    ArticleFilters, CreateArticleRequest, CreateCommentRequest, ListArticlesQuery, LoginRequest,
    Pagination, RegisterRequest, UpdateArticleRequest, UpdateUserRequest, DEFAULT_PAGE_LIMIT,
    MAX_PAGE_LIMIT,
};

// Re-export commonly used response types
pub use responses::{
    ArticleEnvelope, ArticleListResponse, ArticleResponse, AuthResponse, CommentEnvelope,
    CommentListResponse, CommentResponse, HealthChecks, HealthResponse, MessageResponse,
    ProfileEnvelope, ProfileResponse, ReadinessResponse, StatusResponse, UserResponse,
};
