//! # conduit-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `conduit-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers
//! - Repository implementations and the transactional unit of work
//!
//! ## Usage
//!
//! ```rust,ignore
//! use conduit_db::{create_pool, run_migrations, DatabaseConfig, PgArticleRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool, &config.migrations_dir).await?;
//!     let articles = PgArticleRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgArticleRepository, PgCommentRepository, PgFavoriteRepository, PgFollowRepository,
    PgTransaction, PgUnitOfWork, PgUserRepository,
};
