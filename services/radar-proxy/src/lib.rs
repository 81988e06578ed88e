//! XYZ tile gateway in front of the NOAA radar WMS services.
//!
//! Translates `/tiles/{z}/{x}/{y}.png` requests into WMS GetMap calls,
//! optionally composites the hazards layer on top, and lists available
//! animation frames from a TTL-cached GetCapabilities lookup.

pub mod compositor;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod resolver;
pub mod state;
pub mod timestamp_cache;
pub mod upstream;

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Tiles and frames
        .route("/tiles/*path", get(handlers::tile_handler))
        .route("/frames", get(handlers::frames_handler))
        // Discovery API
        .route("/api/areas", get(handlers::areas_handler))
        .route("/api/cache", get(handlers::cache_handler))
        // Health and metrics
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(handlers::fallback_handler)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
