//! Query-string extractor that answers in the API envelope
//!
//! `axum::extract::Query` rejects a malformed query string with a plain-text
//! body. `ApiQuery<T>` deserializes the same way but turns the rejection into
//! an [`ApiError`], so clients always get `{"success": false, "error": ...}`.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::interfaces::http::error::ApiError;

pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
            })?;
        Ok(ApiQuery(value))
    }
}
