use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub authors: u64,
    pub links: u64,
    pub status: String,
    pub version: String,
}

pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<HealthResponse>>, ApiError> {
    let stats = state
        .store
        .stats()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(HealthResponse {
        authors: stats.authors,
        links: stats.links,
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
