//! Discovery endpoints for configured areas and cached frame lists.

use axum::{extract::Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use tile_common::Area;

use crate::state::AppState;
use crate::timestamp_cache::CacheEntryStatus;

#[derive(Debug, Serialize)]
pub struct AreaInfo {
    pub name: Area,
    pub layer: &'static str,
    pub url: &'static str,
}

/// GET /api/areas - Areas accepted by the `area` parameter
pub async fn areas_handler() -> Json<Vec<AreaInfo>> {
    Json(
        Area::ALL
            .into_iter()
            .map(|area| AreaInfo {
                name: area,
                layer: area.config().layer_name,
                url: area.config().base_url,
            })
            .collect(),
    )
}

/// GET /api/cache - Current frame cache entries
pub async fn cache_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Vec<CacheEntryStatus>> {
    Json(state.timestamps.snapshot().await)
}
