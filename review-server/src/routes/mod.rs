//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (body limit, CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `REVIEW_ENABLE_SWAGGER=false`)
//! - Health route (pings the store)
//! - `/reviews` routes

pub mod doc;
mod health;
mod reviews;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use std::sync::Arc;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(reviews::router());

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors::cors_layer(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace::trace_middleware,
        ))
        .with_state(state)
}
