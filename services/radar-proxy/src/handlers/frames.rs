//! Animation frame listing.

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

use tile_common::Area;

use super::common::error_response;
use crate::metrics::record_frames_request;
use crate::resolver::first_value;
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct FramesQuery {
    pub area: Option<String>,
}

impl FramesQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            area: first_value(pairs, "area"),
        }
    }
}

/// GET /frames?area= - Most recent frame timestamps, oldest first
#[instrument(skip(state))]
pub async fn frames_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let query = FramesQuery::from_pairs(&params);
    record_frames_request();

    let area = match Area::from_query(query.area.as_deref()) {
        Ok(area) => area,
        Err(e) => return error_response(&e),
    };
    info!(area = %area, "Frames request");

    match state.timestamps.get_timestamps(area).await {
        Ok(frames) => Json(frames.to_vec()).into_response(),
        Err(e) => {
            error!(area = %area, error = %e, "Failed to get timestamps");
            error_response(&e)
        }
    }
}
