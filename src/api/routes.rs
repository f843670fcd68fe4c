use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Chat bridge
        .route("/events", post(handlers::post_event))
        // Lookups
        .route("/links", get(handlers::search_links))
        .route("/authors/:author/links", get(handlers::author_links))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
