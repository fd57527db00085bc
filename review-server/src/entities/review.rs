use std::future::Future;

use chrono::NaiveDateTime;

use crate::entities::dao::review::format_timestamp;
use crate::entities::{dao::ReviewRecord, SqliteStore};
use crate::sentiment::Sentiment;

type ReviewRow = (i64, String, String, String);

pub trait ReviewStore: Send + Sync + 'static {
    /// Append a review and return the id assigned by storage.
    fn insert_review(
        &self,
        text: &str,
        sentiment: Sentiment,
        created_at: NaiveDateTime,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    fn get_review(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<ReviewRecord>, sqlx::Error>> + Send;

    /// All reviews in ascending id order, optionally restricted to rows whose
    /// `sentiment` equals `sentiment` exactly.
    fn list_reviews(
        &self,
        sentiment: Option<&str>,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, sqlx::Error>> + Send;
}

impl ReviewStore for SqliteStore {
    async fn insert_review(
        &self,
        text: &str,
        sentiment: Sentiment,
        created_at: NaiveDateTime,
    ) -> Result<i64, sqlx::Error> {
        let created_at = format_timestamp(created_at);
        let result = sqlx::query(
            "INSERT INTO reviews (text, sentiment, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(text)
        .bind(sentiment.as_ref())
        .bind(&created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_review(&self, id: i64) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let row: Option<ReviewRow> = sqlx::query_as(
            "SELECT id, text, sentiment, created_at FROM reviews WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(decode_row).transpose()
    }

    async fn list_reviews(&self, sentiment: Option<&str>) -> Result<Vec<ReviewRecord>, sqlx::Error> {
        let rows: Vec<ReviewRow> = if let Some(label) = sentiment {
            sqlx::query_as(
                "SELECT id, text, sentiment, created_at \
                 FROM reviews WHERE sentiment = ?1 ORDER BY id ASC",
            )
            .bind(label)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT id, text, sentiment, created_at FROM reviews ORDER BY id ASC",
            )
            .fetch_all(&self.pool)
            .await?
        };
        rows.into_iter().map(decode_row).collect()
    }
}

fn decode_row((id, text, sentiment, created_at): ReviewRow) -> Result<ReviewRecord, sqlx::Error> {
    let sentiment = sentiment.parse::<Sentiment>().map_err(|e| {
        tracing::error!(id, raw = %sentiment, error = %e, "stored review has an unknown sentiment");
        sqlx::Error::Decode(Box::new(e))
    })?;
    let created_at = created_at.parse::<NaiveDateTime>().map_err(|e| {
        tracing::error!(id, raw = %created_at, error = %e, "stored review has a malformed created_at");
        sqlx::Error::Decode(Box::new(e))
    })?;
    Ok(ReviewRecord {
        id,
        text,
        sentiment,
        created_at,
    })
}
