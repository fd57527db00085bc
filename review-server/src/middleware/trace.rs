use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Bodies larger than this are summarised instead of logged verbatim.
const MAX_LOGGED_BODY: usize = 1024;

/// Wraps every request in an `http_request` span keyed by a trace ID.
///
/// The ID is taken from an incoming `x-trace-id` header when it parses as a
/// UUID, otherwise a fresh one is generated, and is echoed on the response.
/// The request body is buffered for logging, but never past
/// `config.max_body_bytes`: a longer body is answered with 413 here.
pub async fn trace_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let mut response = match forward(req, next, state.config.max_body_bytes).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        };
        if let Some(value) = trace_header {
            response.headers_mut().insert(X_TRACE_ID, value);
        }
        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

async fn forward(req: Request, next: Next, limit: usize) -> Result<Response, ServerError> {
    let (parts, body) = req.into_parts();
    let req_bytes = read_request_body(body, limit).await?;
    log_body("request", &parts.headers, &req_bytes);

    let response = next.run(Request::from_parts(parts, Body::from(req_bytes))).await;

    let (parts, body) = response.into_parts();
    let res_bytes = body
        .collect()
        .await
        .map_err(|e| ServerError::Internal(format!("failed to buffer response body: {e}")))?
        .to_bytes();
    log_body("response", &parts.headers, &res_bytes);
    Ok(Response::from_parts(parts, Body::from(res_bytes)))
}

async fn read_request_body(body: Body, limit: usize) -> Result<Bytes, ServerError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(ServerError::PayloadTooLarge(format!(
            "request body larger than {limit} bytes"
        ))),
        Err(e) => Err(ServerError::BadRequest(format!("failed to read request body: {e}"))),
    }
}

fn log_body(direction: &str, headers: &HeaderMap, bytes: &Bytes) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") && bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(bytes) {
            debug!("{} body: {}", direction, text);
        }
    } else if !bytes.is_empty() {
        debug!(
            "{} body: [skipped: type={}, size={}]",
            direction,
            content_type,
            bytes.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::io;

    #[tokio::test]
    async fn body_within_limit_is_returned_whole() {
        let bytes = read_request_body(Body::from("0123456789"), 10).await.unwrap();
        assert_eq!(&bytes[..], b"0123456789");
    }

    #[tokio::test]
    async fn body_over_limit_is_rejected() {
        let err = read_request_body(Body::from(vec![b'a'; 11]), 10).await.unwrap_err();
        match err {
            ServerError::PayloadTooLarge(m) => assert!(m.contains("10 bytes")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn broken_stream_is_a_bad_request_not_an_empty_body() {
        let chunks: Vec<Result<Bytes, io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"text\":")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away")),
        ];
        let body = Body::from_stream(stream::iter(chunks));
        let err = read_request_body(body, 1024).await.unwrap_err();
        match err {
            ServerError::BadRequest(m) => assert!(m.contains("peer went away")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
