//! Application state and shared resources.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::timestamp_cache::TimestampCache;
use crate::upstream::{MapSource, WmsClient};

/// Shared application state, built once at startup.
pub struct AppState {
    pub source: Arc<dyn MapSource>,
    pub timestamps: TimestampCache,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// State backed by the live WMS service.
    pub fn new(config: &ProxyConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let client = WmsClient::new(config.upstream_timeout())?;
        Ok(Self::with_source(config, Arc::new(client), prometheus))
    }

    /// State backed by an arbitrary map source.
    pub fn with_source(
        config: &ProxyConfig,
        source: Arc<dyn MapSource>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        let timestamps =
            TimestampCache::new(Arc::clone(&source), config.cache_ttl(), config.frame_count);

        Self {
            source,
            timestamps,
            prometheus,
        }
    }
}
