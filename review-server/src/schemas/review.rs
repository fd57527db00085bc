//! Request / response types for the review API (`/reviews`).

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::dao::review::format_timestamp;
use crate::entities::ReviewRecord;
use crate::sentiment::Sentiment;

/// Request body for `POST /reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateReviewRequest {
    /// Free-text review content.
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

/// Query parameters for `GET /reviews`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListReviewsQuery {
    /// Exact sentiment label to filter on. Unknown labels match nothing.
    pub sentiment: Option<String>,
}

impl ListReviewsQuery {
    /// Build from raw query pairs. A repeated `sentiment` key keeps its last
    /// value; unrelated keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let sentiment = pairs
            .into_iter()
            .filter(|(key, _)| key == "sentiment")
            .map(|(_, value)| value)
            .last();
        Self { sentiment }
    }

    /// The filter to hand to storage; an empty `sentiment=` counts as absent.
    pub fn filter(&self) -> Option<&str> {
        self.sentiment.as_deref().filter(|s| !s.is_empty())
    }
}

/// A stored review as returned by both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub text: String,
    pub sentiment: Sentiment,
    /// UTC, ISO-8601, no offset suffix.
    pub created_at: String,
}

impl ReviewRecord {
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            text: self.text.clone(),
            sentiment: self.sentiment,
            created_at: format_timestamp(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_fails_validation() {
        let req = CreateReviewRequest { text: String::new() };
        assert!(req.validate().is_err());
        let req = CreateReviewRequest { text: "ok".into() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_filter_is_treated_as_absent() {
        let q = ListReviewsQuery { sentiment: Some(String::new()) };
        assert_eq!(q.filter(), None);
        let q = ListReviewsQuery { sentiment: Some("neutral".into()) };
        assert_eq!(q.filter(), Some("neutral"));
        assert_eq!(ListReviewsQuery::default().filter(), None);
    }

    #[test]
    fn repeated_sentiment_keeps_last_value() {
        let pairs = vec![
            ("sentiment".to_owned(), "negative".to_owned()),
            ("page".to_owned(), "2".to_owned()),
            ("sentiment".to_owned(), "positive".to_owned()),
        ];
        let q = ListReviewsQuery::from_pairs(pairs);
        assert_eq!(q.filter(), Some("positive"));
        assert_eq!(ListReviewsQuery::from_pairs(Vec::new()).filter(), None);
    }
}
