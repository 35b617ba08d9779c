//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

/// Health check response: status, module name, version and catalog size
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub songs: i64,
}

/// GET /health
///
/// Fails with 500 when the database cannot be read.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let songs = introquiz_common::db::songs::count_songs(&state.db).await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        module: "introquiz-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        songs,
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
