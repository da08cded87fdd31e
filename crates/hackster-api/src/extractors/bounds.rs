//! Listing bounds extractor
//!
//! Extracts and validates paging parameters from query strings. Every
//! bounded listing requires an explicit `limit`; there is no server-chosen
//! default page size.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use hackster_core::entities::RecordStatus;
use serde::Deserialize;

use crate::response::ApiError;

/// Smallest page any listing accepts
const MIN_LIMIT: i64 = 1;
/// Largest page any listing accepts
const MAX_LIMIT: i64 = 500;

/// Raw listing query parameters
#[derive(Debug, Deserialize)]
pub struct BoundsParams {
    /// Maximum number of items to return
    #[serde(default)]
    pub limit: Option<i64>,
    /// Number of items to skip
    #[serde(default)]
    pub offset: Option<i64>,
    /// Restrict to records in this status
    #[serde(default)]
    pub status: Option<String>,
}

/// Validated listing bounds
#[derive(Debug, Clone)]
pub struct Bounds {
    pub status: Option<RecordStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl TryFrom<BoundsParams> for Bounds {
    type Error = ApiError;

    fn try_from(params: BoundsParams) -> Result<Self, Self::Error> {
        let Some(limit) = params.limit else {
            return Err(ApiError::invalid_query(format!(
                "'limit' is required ({MIN_LIMIT}-{MAX_LIMIT})"
            )));
        };
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::invalid_query(format!(
                "'limit' must be between {MIN_LIMIT} and {MAX_LIMIT}"
            )));
        }

        let offset = params.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::invalid_query("'offset' must not be negative"));
        }

        let status = params
            .status
            .as_deref()
            .map(RecordStatus::from_str)
            .transpose()
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(Bounds {
            status,
            limit,
            offset,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Bounds
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<BoundsParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Bounds::try_from(params)
    }
}
