//! Ports implemented by the infrastructure layer

mod clock;
mod repositories;

pub use clock::{Clock, SystemClock};
pub use repositories::{
    ArticlePage, ArticleQuery, ArticleRepository, CommentRepository, FavoriteRepository,
    FollowRepository, RepoResult, Transaction, UnitOfWork, UserRepository,
};
