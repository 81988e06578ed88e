//! Common types shared by the radar tile proxy crates.

pub mod area;
pub mod bbox;
pub mod error;
pub mod tile;

pub use area::{Area, AreaConfig, HAZARDS};
pub use bbox::BoundingBox;
pub use error::{ErrorKind, ProxyError, ProxyResult};
pub use tile::{tile_to_bbox, TileCoord, MAX_ZOOM, TILE_SIZE};
