//! XYZ tile addressing and Web Mercator bounding box math.

use std::f64::consts::PI;

use crate::{BoundingBox, ProxyError, ProxyResult};

/// Tile edge length in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level accepted by the proxy.
pub const MAX_ZOOM: u8 = 22;

/// Spherical-Mercator Earth radius in meters.
const EARTH_RADIUS: f64 = 6378137.0;

/// Top-left corner of the Web Mercator world.
const ORIGIN_X: f64 = -20037508.3427892;
const ORIGIN_Y: f64 = 20037508.3427892;

/// A tile coordinate (z/x/y).
///
/// Column and row are signed and not checked against the zoom's matrix size;
/// out-of-range values map to a bbox outside the world extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level
    pub z: u8,
    /// Column (x)
    pub x: i64,
    /// Row (y)
    pub y: i64,
}

impl TileCoord {
    pub fn new(z: u8, x: i64, y: i64) -> Self {
        Self { z, x, y }
    }

    /// Build a coordinate from raw path values, rejecting zooms outside `0..=22`.
    pub fn checked(z: i64, x: i64, y: i64) -> ProxyResult<Self> {
        if !(0..=MAX_ZOOM as i64).contains(&z) {
            return Err(ProxyError::InvalidZoom(z));
        }
        Ok(Self::new(z as u8, x, y))
    }

    /// Projected bounds of this tile.
    pub fn bbox(&self) -> BoundingBox {
        tile_to_bbox(self.x, self.y, self.z)
    }
}

/// Meters per pixel at the given zoom.
pub fn resolution(zoom: u8) -> f64 {
    (2.0 * PI * EARTH_RADIUS) / TILE_SIZE as f64 / 2f64.powi(zoom as i32)
}

/// Convert XYZ tile indices to an EPSG:3857 bounding box.
pub fn tile_to_bbox(x: i64, y: i64, zoom: u8) -> BoundingBox {
    let tile_span = resolution(zoom) * TILE_SIZE as f64;

    let min_x = ORIGIN_X + x as f64 * tile_span;
    let max_y = ORIGIN_Y - y as f64 * tile_span;
    let max_x = min_x + tile_span;
    let min_y = max_y - tile_span;

    BoundingBox::new(min_x, min_y, max_x, max_y)
}
