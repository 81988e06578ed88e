//! HTTP request handlers.
//!
//! - `tiles`: XYZ tile endpoint
//! - `frames`: available animation frames
//! - `api`: area and cache discovery
//! - `metrics`: health check and Prometheus exposition
//! - `common`: shared response helpers

pub mod api;
pub mod common;
pub mod frames;
pub mod metrics;
pub mod tiles;

pub use api::{areas_handler, cache_handler, AreaInfo};
pub use common::{error_response, png_response};
pub use frames::{frames_handler, FramesQuery};
pub use self::metrics::{health_handler, metrics_handler};
pub use tiles::{fallback_handler, tile_handler};
