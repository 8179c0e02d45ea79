//! # conduit-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ArticleService, AuthService, CommentService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, UserService,
};
