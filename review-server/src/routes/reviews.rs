//! Review collection endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::entities::ReviewStore;
use crate::error::ServerError;
use crate::extract::ValidatedJson;
use crate::schemas::review::{CreateReviewRequest, ListReviewsQuery, ReviewResponse};
use crate::sentiment::Sentiment;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_review, list_reviews),
    components(schemas(CreateReviewRequest, ReviewResponse, Sentiment))
)]
pub struct ReviewsApi;

/// Register review routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/reviews", get(list_reviews).post(create_review))
}

/// Classify, store and return a new review.
///
/// The response is the row as read back from storage, not an echo of the
/// request, so a write that storage silently lost is reported as a 500.
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = ReviewResponse),
        (status = 422, description = "Missing or malformed body"),
        (status = 500, description = "Storage failure or inserted review could not be read back"),
    )
)]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>, ServerError> {
    let sentiment = state.classifier.classify(&req.text);
    let created_at = Utc::now().naive_utc();

    let id = state.store.insert_review(&req.text, sentiment, created_at).await?;
    let record = state
        .store
        .get_review(id)
        .await?
        .ok_or(ServerError::InconsistentReadAfterWrite(id))?;

    info!(review_id = record.id, sentiment = %record.sentiment, "review stored");
    Ok(Json(record.to_response()))
}

/// List stored reviews in ascending id order.
///
/// When `sentiment` is given more than once, the last value is used.
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    params(ListReviewsQuery),
    responses(
        (status = 200, description = "Reviews, possibly empty", body = Vec<ReviewResponse>),
        (status = 422, description = "Undecodable query string"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    query: ListReviewsQuery,
) -> Result<Json<Vec<ReviewResponse>>, ServerError> {
    let filter = query.filter();
    let reviews = state.store.list_reviews(filter).await?;
    debug!(sentiment = ?filter, count = reviews.len(), "listed reviews");
    Ok(Json(reviews.iter().map(|r| r.to_response()).collect()))
}
