//! XYZ tile endpoint.

use axum::{
    extract::{Extension, OriginalUri, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use tile_common::ErrorKind;

use super::common::{error_response, png_response};
use crate::metrics::record_tile_request;
use crate::resolver::{resolve_tile, TileQuery};
use crate::state::AppState;

/// GET /tiles/{z}/{x}/{y}.png?area=&alerts=&time=
#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let query = TileQuery::from_pairs(&params);
    info!(
        area = ?query.area,
        alerts = ?query.alerts,
        time = ?query.time,
        "Tile request"
    );
    record_tile_request();

    match resolve_tile(&state, uri.path(), &query).await {
        Ok(png) => png_response(png),
        Err(e) => {
            match e.kind() {
                ErrorKind::Client => warn!(error = %e, "Rejected tile request"),
                _ => error!(error = %e, "Tile request failed"),
            }
            error_response(&e)
        }
    }
}

/// Unrouted paths. `/tiles` and `/tiles/` miss the wildcard route but still
/// get the tile handler's "invalid tile path" answer.
pub async fn fallback_handler(
    method: Method,
    state: Extension<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    params: Query<Vec<(String, String)>>,
) -> Response {
    let path = uri.path();
    if method == Method::GET && (path == "/tiles" || path.starts_with("/tiles/")) {
        return tile_handler(state, OriginalUri(uri), params).await;
    }
    StatusCode::NOT_FOUND.into_response()
}
