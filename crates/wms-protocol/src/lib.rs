//! Client side of the OGC WMS 1.3.0 protocol.
//!
//! Builds GetMap / GetCapabilities query parameters and extracts the
//! TIME dimension from capabilities documents.

pub mod capabilities;
pub mod getmap;

pub use capabilities::{parse_time_dimension, CapabilitiesError};
pub use getmap::{capabilities_query, GetMapRequest, WMS_VERSION};
