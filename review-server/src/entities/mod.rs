//! Persistence layer.
//!
//! [`SqliteStore`] owns the sqlx connection pool and creates the schema on
//! connect. Per-table operations live in traits ([`ReviewStore`]) so handler
//! code depends on behaviour rather than on the concrete pool.
//!
//! Every query borrows a connection from the pool for the duration of one
//! statement; the guard hands it back on drop, including on error paths.

pub mod dao;
pub mod review;

pub use dao::ReviewRecord;
pub use review::ReviewStore;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const CREATE_REVIEWS_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS reviews (\
        id INTEGER PRIMARY KEY AUTOINCREMENT, \
        text TEXT NOT NULL, \
        sentiment TEXT NOT NULL, \
        created_at TEXT NOT NULL\
    )";

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and make sure the
    /// `reviews` table exists.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://reviews.db"`
    /// or `"sqlite::memory:"` for tests. In-memory databases live and die with
    /// their connection, so the pool is pinned to a single long-lived one.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `reviews` table if it is missing. Safe to call repeatedly.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_REVIEWS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Round-trip a trivial statement to prove the store is answering.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for checked-out connections to return and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::Sentiment;
    use chrono::Utc;
    use tempfile::TempDir;

    fn file_url(dir: &TempDir) -> String {
        format!("sqlite://{}", dir.path().join("reviews.db").display())
    }

    #[tokio::test]
    async fn connect_creates_database_file() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(&file_url(&dir), 2).await.unwrap();
        assert!(dir.path().join("reviews.db").exists());
        store.close().await;
    }

    #[tokio::test]
    async fn ensure_schema_twice_keeps_rows() {
        let store = SqliteStore::connect("sqlite::memory:", 5).await.unwrap();
        let id = store
            .insert_review("хорошо", Sentiment::Positive, Utc::now().naive_utc())
            .await
            .unwrap();

        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();

        let all = store.list_reviews(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
    }

    #[tokio::test]
    async fn reconnecting_to_existing_file_preserves_data() {
        let dir = TempDir::new().unwrap();
        let url = file_url(&dir);

        let first = SqliteStore::connect(&url, 2).await.unwrap();
        first
            .insert_review("плохо", Sentiment::Negative, Utc::now().naive_utc())
            .await
            .unwrap();
        first.close().await;

        let second = SqliteStore::connect(&url, 2).await.unwrap();
        let all = second.list_reviews(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "плохо");
        assert_eq!(all[0].sentiment, Sentiment::Negative);
        second.close().await;
    }

    #[tokio::test]
    async fn unreachable_location_fails_to_connect() {
        let dir = TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}",
            dir.path().join("missing").join("nested").join("reviews.db").display()
        );
        assert!(SqliteStore::connect(&url, 1).await.is_err());
    }

    #[tokio::test]
    async fn ping_fails_once_pool_is_closed() {
        let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
        store.ping().await.unwrap();
        store.close().await;
        assert!(matches!(store.ping().await, Err(sqlx::Error::PoolClosed)));
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:test?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://reviews.db"));
    }
}
