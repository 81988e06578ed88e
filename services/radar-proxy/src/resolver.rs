//! Single-pass resolution of an XYZ tile request.
//!
//! A request moves through: parse path, validate zoom, resolve area,
//! resolve timestamp, fetch the radar layer, optionally fetch the hazards
//! layer, composite, encode. Any failure before the hazards step ends the
//! request; a hazards failure only drops the overlay.

use tracing::{info, warn};

use tile_common::{Area, ProxyError, ProxyResult, TileCoord, HAZARDS};

use crate::compositor::{composite, encode_png};
use crate::metrics::record_overlay_failure;
use crate::state::AppState;

/// Query parameters accepted on `/tiles/{z}/{x}/{y}.png`.
#[derive(Debug, Clone, Default)]
pub struct TileQuery {
    /// Coverage area name (default: conus)
    pub area: Option<String>,
    /// Overlay watches/warnings when true
    pub alerts: Option<String>,
    /// ISO8601 frame time (default: most recent frame)
    pub time: Option<String>,
}

impl TileQuery {
    /// Build from raw query pairs. A repeated key keeps its first value.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            area: first_value(pairs, "area"),
            alerts: first_value(pairs, "alerts"),
            time: first_value(pairs, "time"),
        }
    }
}

/// First value of `key` among decoded query pairs.
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// A validated tile request, before any upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub coord: TileCoord,
    pub area: Area,
    pub alerts: bool,
    pub time: Option<String>,
}

impl TileRequest {
    /// Validate path and query: tile path, then zoom, then area.
    pub fn parse(path: &str, query: &TileQuery) -> ProxyResult<Self> {
        let coord = parse_tile_path(path)?;
        let area = Area::from_query(query.area.as_deref())?;

        Ok(Self {
            coord,
            area,
            alerts: parse_bool(query.alerts.as_deref()),
            time: query.time.clone().filter(|t| !t.is_empty()),
        })
    }
}

/// Parse `/tiles/{z}/{x}/{y}.png` into a zoom-checked tile coordinate.
///
/// The path may still be percent-encoded.
pub fn parse_tile_path(path: &str) -> ProxyResult<TileCoord> {
    let path = urlencoding::decode(path).map_err(|_| ProxyError::InvalidTilePath)?;
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() != 5 || !parts[0].is_empty() || parts[1] != "tiles" {
        return Err(ProxyError::InvalidTilePath);
    }

    let y = parts[4]
        .strip_suffix(".png")
        .ok_or(ProxyError::InvalidTilePath)?;
    let parse = |s: &str| s.parse::<i64>().map_err(|_| ProxyError::InvalidTilePath);

    TileCoord::checked(parse(parts[2])?, parse(parts[3])?, parse(y)?)
}

/// Lenient boolean: `1`, `t`, `true` (any case) are true; anything else is false.
pub fn parse_bool(value: Option<&str>) -> bool {
    matches!(
        value.map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "t" | "true")
    )
}

/// Resolve a tile request to PNG bytes.
pub async fn resolve_tile(state: &AppState, path: &str, query: &TileQuery) -> ProxyResult<Vec<u8>> {
    let request = TileRequest::parse(path, query)?;
    let timestamp = resolve_timestamp(state, &request).await?;
    let bbox = request.coord.bbox();

    info!(
        z = request.coord.z,
        x = request.coord.x,
        y = request.coord.y,
        area = %request.area,
        alerts = request.alerts,
        time = %timestamp,
        "Resolving tile"
    );

    let radar = state
        .source
        .fetch_tile(request.area.config(), &bbox, Some(timestamp.as_str()))
        .await?;

    let tile = if request.alerts {
        match state.source.fetch_tile(&HAZARDS, &bbox, Some(timestamp.as_str())).await {
            Ok(hazards) => composite(&radar, &hazards),
            Err(e) => {
                warn!(error = %e, "Hazards overlay unavailable, serving radar only");
                record_overlay_failure();
                radar
            }
        }
    } else {
        radar
    };

    encode_png(&tile)
}

/// Use the requested time, or the newest cached frame for the area.
async fn resolve_timestamp(state: &AppState, request: &TileRequest) -> ProxyResult<String> {
    if let Some(time) = &request.time {
        return Ok(time.clone());
    }

    match state.timestamps.get_timestamps(request.area).await {
        Ok(frames) => frames.last().cloned().ok_or(ProxyError::NoTimestamp),
        Err(e) => {
            warn!(area = %request.area, error = %e, "Could not get latest timestamp");
            Err(ProxyError::NoTimestamp)
        }
    }
}
