//! holonet-ag library - fetch/cache/aggregate layer over a paginated REST API
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod cache;
pub mod client;
pub mod consumer;
pub mod error;
pub mod fetcher;
pub mod join;
pub mod shaping;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use cache::ResourceCache;
use client::{HttpPageSource, PageSource};
use fetcher::CollectionFetcher;
use holonet_common::config::AggregatorConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-lifetime resource cache
    pub cache: Arc<ResourceCache>,
}

impl AppState {
    pub fn new(cache: Arc<ResourceCache>) -> Self {
        Self { cache }
    }

    /// State backed by an arbitrary page source
    pub fn with_source(
        base_url: impl Into<String>,
        source: Arc<dyn PageSource>,
        reuse_first_page: bool,
    ) -> Self {
        let fetcher = CollectionFetcher::new(source, reuse_first_page);
        Self::new(Arc::new(ResourceCache::new(base_url, fetcher)))
    }

    /// State talking HTTP to the configured remote API
    pub fn from_config(config: &AggregatorConfig) -> holonet_common::Result<Self> {
        let source = Arc::new(HttpPageSource::new(config.request_timeout())?);
        Ok(Self::with_source(
            config.base_url.clone(),
            source,
            config.reuse_first_page,
        ))
    }
}

/// Build application router
///
/// Resource routes are served at the root and under `/api/starWars`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::resource_routes())
        .nest("/api/starWars", api::resource_routes())
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
