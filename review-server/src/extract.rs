//! Request extractors.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ServerError;
use crate::schemas::review::ListReviewsQuery;

/// Like [`axum::Json`], but rejections and `validator` failures come back as
/// [`ServerError`] with a JSON error body.
///
/// Bad syntax, missing or mistyped fields and a wrong content type are all
/// [`ServerError::Validation`] (422). A body over the configured limit stays
/// a 413.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(from_json_rejection)?;
        value
            .validate()
            .map_err(|e| ServerError::Validation(e.to_string()))?;
        Ok(Self(value))
    }
}

fn from_json_rejection(rejection: JsonRejection) -> ServerError {
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ServerError::PayloadTooLarge(rejection.body_text()),
        _ => ServerError::Validation(rejection.body_text()),
    }
}

/// Reads `?sentiment=` leniently: repeated keys keep the last value, and a
/// query string that cannot be decoded is a JSON 422 rather than axum's
/// plain-text 400.
impl<S> FromRequestParts<S> for ListReviewsQuery
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::Validation(rejection.body_text()))?;
        Ok(Self::from_pairs(pairs))
    }
}
