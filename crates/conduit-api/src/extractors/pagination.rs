//! Listing query extractor
//!
//! Parses `tag`, `author`, `favorited`, `limit` and `offset` from the query string.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use conduit_service::dto::{ArticleFilters, ListArticlesQuery, Pagination};

use crate::response::ApiError;

/// Article listing filters plus a checked page window
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filters: ArticleFilters,
    pub page: Pagination,
}

impl TryFrom<ListArticlesQuery> for ListQuery {
    type Error = ApiError;

    fn try_from(params: ListArticlesQuery) -> Result<Self, Self::Error> {
        let (filters, page) = params.into_parts()?;
        Ok(Self { filters, page })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListArticlesQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        ListQuery::try_from(params)
    }
}
