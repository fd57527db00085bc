//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Storage errors are logged with full detail but only a generic message is
//! returned to the caller so that paths and SQL never leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// All errors that can occur in the review-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The store could not be reached, or a read or write failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request body was missing, malformed, or failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request body exceeded the configured limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// The request body could not be read off the connection.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An insert reported success but the row could not be read back.
    #[error("review {0} was stored but could not be read back")]
    InconsistentReadAfterWrite(i64),

    /// A dependency the server needs (the store) is not answering.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Database(_)
            | ServerError::InconsistentReadAfterWrite(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let client_message = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::Validation(m)
            | ServerError::BadRequest(m)
            | ServerError::PayloadTooLarge(m) => m.clone(),

            ServerError::InconsistentReadAfterWrite(id) => {
                error!(review_id = *id, "inserted review missing on read-back");
                self.to_string()
            }

            ServerError::Unavailable(m) => {
                warn!(reason = %m, "dependency unavailable");
                "service unavailable".to_owned()
            }

            // Internal errors: log the full detail, keep the response generic.
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                "internal server error".to_owned()
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                "internal server error".to_owned()
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_422_with_message() {
        let resp = ServerError::Validation("text: missing field".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(resp).await["error"], "text: missing field");
    }

    #[tokio::test]
    async fn database_error_hides_detail() {
        let resp = ServerError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "internal server error");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let resp = ServerError::Internal("response body stream broke".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "internal server error");
    }

    #[tokio::test]
    async fn oversized_body_maps_to_413() {
        let resp = ServerError::PayloadTooLarge("request body larger than 64 bytes".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_json(resp).await["error"].as_str().unwrap().contains("64 bytes"));
    }

    #[tokio::test]
    async fn unavailable_maps_to_503() {
        let resp = ServerError::Unavailable("pool closed".into()).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(resp).await["error"], "service unavailable");
    }

    #[tokio::test]
    async fn read_after_write_names_the_id() {
        let resp = ServerError::InconsistentReadAfterWrite(7).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("review 7"));
    }
}
