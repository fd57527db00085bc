//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for review-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// SQLite database URL (default: `"sqlite://reviews.db"`).
    /// Use `"sqlite::memory:"` for a throwaway store.
    pub database_url: String,

    /// Upper bound on pooled SQLite connections.
    pub db_max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins. `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Largest accepted request body, in bytes. Applies both to the trace
    /// middleware's buffering and to JSON extraction.
    pub max_body_bytes: usize,

    /// Mount Swagger UI at `/swagger-ui` and the spec at `/api-docs/openapi.json`.
    pub enable_swagger: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_owned(),
            database_url: "sqlite://reviews.db".to_owned(),
            db_max_connections: 5,
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: None,
            max_body_bytes: 2 * 1024 * 1024,
            enable_swagger: true,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env_or("REVIEW_BIND", &defaults.bind_address),
            database_url: env_or("REVIEW_DATABASE_URL", &defaults.database_url),
            db_max_connections: parse_env("REVIEW_DB_MAX_CONNECTIONS", defaults.db_max_connections),
            log_level: env_or("REVIEW_LOG", &defaults.log_level),
            log_json: env_flag("REVIEW_LOG_JSON", defaults.log_json),
            cors_allowed_origins: std::env::var("REVIEW_CORS_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            max_body_bytes: parse_env("REVIEW_MAX_BODY_BYTES", defaults.max_body_bytes),
            enable_swagger: env_flag("REVIEW_ENABLE_SWAGGER", defaults.enable_swagger),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
