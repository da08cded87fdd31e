//! Operator authentication extractor
//!
//! Validates the static bearer token from the Authorization header against
//! the configured operator token.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::response::ApiError;
use crate::state::AppState;

/// Proof that the request carried the operator token
///
/// Mutating routes and the operator read surfaces take this as an argument;
/// extraction failing is what produces the 401.
#[derive(Debug, Clone, Copy)]
pub struct Operator;

#[async_trait]
impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthorized("missing or malformed authorization header")
                })?;

        let app_state = AppState::from_ref(state);

        // Never log the presented token
        if bearer.token() != app_state.config().auth.api_token {
            tracing::warn!("Rejected request with an unrecognized bearer token");
            return Err(ApiError::Unauthorized("invalid token"));
        }

        Ok(Operator)
    }
}
