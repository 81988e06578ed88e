//! WMS GetMap and GetCapabilities request parameters.

use tile_common::{BoundingBox, TILE_SIZE};

/// Protocol version sent with every request.
pub const WMS_VERSION: &str = "1.3.0";

/// A GetMap request for a single PNG tile in EPSG:3857.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMapRequest<'a> {
    /// Layer to render
    pub layer: &'a str,
    /// Bounding box in EPSG:3857 meters
    pub bbox: BoundingBox,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// TIME dimension value, if pinned
    pub time: Option<&'a str>,
}

impl<'a> GetMapRequest<'a> {
    /// Standard 256x256 tile request.
    pub fn tile(layer: &'a str, bbox: BoundingBox, time: Option<&'a str>) -> Self {
        Self {
            layer,
            bbox,
            width: TILE_SIZE,
            height: TILE_SIZE,
            time,
        }
    }

    /// Key-value pairs for the request query string.
    ///
    /// TIME is only sent when a non-empty value is set; the server then
    /// falls back to its default frame.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("SERVICE", "WMS".to_string()),
            ("VERSION", WMS_VERSION.to_string()),
            ("REQUEST", "GetMap".to_string()),
            ("FORMAT", "image/png".to_string()),
            ("TRANSPARENT", "true".to_string()),
            ("LAYERS", self.layer.to_string()),
            ("STYLES", String::new()),
            ("WIDTH", self.width.to_string()),
            ("HEIGHT", self.height.to_string()),
            ("CRS", "EPSG:3857".to_string()),
            ("BBOX", self.bbox.to_wms_string()),
        ];
        if let Some(time) = self.time.filter(|t| !t.is_empty()) {
            pairs.push(("TIME", time.to_string()));
        }
        pairs
    }
}

/// Key-value pairs for a GetCapabilities request.
pub fn capabilities_query() -> [(&'static str, &'static str); 3] {
    [
        ("SERVICE", "WMS"),
        ("VERSION", WMS_VERSION),
        ("REQUEST", "GetCapabilities"),
    ]
}
