pub mod api;
pub mod render;
pub mod state;
pub mod summarizer;
pub mod text_source;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all dashboard routes
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/order/{id}", get(api::order_detail))
        .route("/order/{id}/summarize", get(api::summarize_order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
