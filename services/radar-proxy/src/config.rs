//! Runtime configuration, parsed from command-line flags and environment.

use clap::{ArgAction, Parser};
use std::time::Duration;

/// Radar tile proxy configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "radar-proxy")]
#[command(about = "XYZ tile proxy for NOAA radar and hazards WMS layers")]
pub struct ProxyConfig {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "RADAR_PROXY_LISTEN")]
    pub listen: String,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "RADAR_PROXY_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Timeout for every upstream WMS request, in seconds
    #[arg(long, default_value_t = 15, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: u64,

    /// How long a fetched frame list stays valid, in seconds
    #[arg(long, default_value_t = 300, env = "FRAME_CACHE_TTL_SECS")]
    pub cache_ttl_secs: u64,

    /// Number of most recent frames kept per area
    #[arg(long, default_value_t = 12, env = "FRAME_COUNT")]
    pub frame_count: usize,

    /// Install the Prometheus exporter and serve /metrics
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "RADAR_PROXY_METRICS")]
    pub metrics: bool,
}

impl ProxyConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            worker_threads: None,
            upstream_timeout_secs: 15,
            cache_ttl_secs: 300,
            frame_count: 12,
            metrics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = ProxyConfig::parse_from([
            "radar-proxy",
            "--listen",
            "127.0.0.1:9000",
            "--cache-ttl-secs",
            "60",
            "--frame-count",
            "6",
            "--metrics",
            "false",
        ]);
        assert_eq!(config.listen, "127.0.0.1:9000");
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.frame_count, 6);
        assert!(!config.metrics);
    }

    #[test]
    fn test_log_level_ignores_rust_log() {
        std::env::set_var("RUST_LOG", "trace");
        let config = ProxyConfig::parse_from(["radar-proxy"]);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_default_matches_reference_values() {
        let config = ProxyConfig::default();
        assert_eq!(config.upstream_timeout(), Duration::from_secs(15));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.frame_count, 12);
    }
}
