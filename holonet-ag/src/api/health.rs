//! Health and cache status endpoints

use axum::{extract::State, routing::get, Json, Router};
use holonet_common::ResourceKind;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// Populated bucket sizes; `None` while a bucket is still empty
#[derive(Debug, Serialize)]
pub struct CacheStatusResponse {
    pub planets: Option<usize>,
    pub people: Option<usize>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "holonet-ag".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /cache
///
/// Reports what is cached without triggering population.
pub async fn cache_status(State(state): State<AppState>) -> Json<CacheStatusResponse> {
    let planets = state.cache.peek(ResourceKind::Planets).await;
    let people = state.cache.peek(ResourceKind::People).await;

    Json(CacheStatusResponse {
        planets: planets.map(|snapshot| snapshot.len()),
        people: people.map(|snapshot| snapshot.len()),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/cache", get(cache_status))
}
