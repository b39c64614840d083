//! Pagination extractor
//!
//! Extracts keyset pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use graph_core::entities::{EdgeCursor, EdgePage, DEFAULT_PAGE_LIMIT};
use graph_core::TargetType;
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PaginationParams {
    /// Resume after this cursor (`<created_at-micros>:<id>`, or
    /// `<created_at-micros>:<type>:<id>` for reacted-target listings)
    #[serde(default)]
    pub after: Option<String>,
    /// Maximum number of items to return
    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

/// Validated pagination parameters
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: EdgePage,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: EdgePage::first(DEFAULT_PAGE_LIMIT),
        }
    }
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        params.validate()?;

        let page = EdgePage::first(params.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        let page = match params.after.as_deref() {
            Some(raw) => page.after(
                EdgeCursor::decode(raw)
                    .map_err(|_| ApiError::invalid_query("Invalid 'after' cursor format"))?,
            ),
            None => page,
        };

        Ok(Pagination { page })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Pagination::try_from(params)
    }
}

#[derive(Debug, Deserialize)]
struct TargetTypeParams {
    #[serde(rename = "type")]
    target_type: Option<String>,
}

/// Optional `?type=video|comment|tweet` narrowing of a listing
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetTypeFilter(pub Option<TargetType>);

#[async_trait]
impl<S> FromRequestParts<S> for TargetTypeFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<TargetTypeParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        let target_type = params
            .target_type
            .map(|raw| raw.parse::<TargetType>())
            .transpose()?;

        Ok(TargetTypeFilter(target_type))
    }
}
