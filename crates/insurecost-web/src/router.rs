//! Axum router — maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use crate::state::SharedState;
use crate::handlers::{
    api::{api_form, api_update_field, api_predict, api_outcome},
    page::{prediction_page, prediction_submit},
    system::health,
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(shared: SharedState) -> Router {
    Router::new()
        // Page
        .route("/",       get(prediction_page).post(prediction_submit))
        .route("/health", get(health))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/form",       get(api_form))
        .route("/api/form/field", post(api_update_field))
        .route("/api/predict",    post(api_predict))
        .route("/api/outcome",    get(api_outcome))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
