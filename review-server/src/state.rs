//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::entities::SqliteStore;
use crate::sentiment::SentimentClassifier;

/// State shared across all HTTP handlers. Everything in here is read-only;
/// per-request data never lives here.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent review store.
    pub store: Arc<SqliteStore>,
    /// Ordered sentiment rules applied to every new review.
    pub classifier: Arc<SentimentClassifier>,
}
