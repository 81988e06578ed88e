//! Per-area cache of the most recent radar frame timestamps.
//!
//! Entries expire after a fixed TTL. Readers share a snapshot of the frame
//! list; a miss or an expired entry refetches GetCapabilities and replaces
//! the entry. Concurrent misses for the same area are not coalesced, so each
//! may reach the upstream service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use tile_common::{Area, ProxyResult};

use crate::metrics::{record_cache_hit, record_cache_miss};
use crate::upstream::MapSource;

struct CacheEntry {
    timestamps: Arc<[String]>,
    refreshed_at: DateTime<Utc>,
    /// `None` when the TTL runs past what `Instant` can represent.
    expiry: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expiry.map_or(true, |expiry| now < expiry)
    }
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryStatus {
    pub area: Area,
    pub frames: usize,
    pub latest: Option<String>,
    pub refreshed_at: DateTime<Utc>,
    /// Absent for entries that never expire.
    pub expires_in_secs: Option<u64>,
}

/// TTL cache of available frame timestamps, keyed by area.
pub struct TimestampCache {
    source: Arc<dyn MapSource>,
    entries: RwLock<HashMap<Area, CacheEntry>>,
    ttl: Duration,
    frame_count: usize,
}

impl TimestampCache {
    pub fn new(source: Arc<dyn MapSource>, ttl: Duration, frame_count: usize) -> Self {
        info!(
            ttl_secs = ttl.as_secs(),
            frame_count = frame_count,
            "Initializing frame timestamp cache"
        );
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
            ttl,
            frame_count,
        }
    }

    /// Most recent frame timestamps for `area`, oldest first.
    ///
    /// The returned slice is shared with other readers.
    pub async fn get_timestamps(&self, area: Area) -> ProxyResult<Arc<[String]>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&area) {
                if entry.is_fresh(Instant::now()) {
                    debug!(area = %area, "Returning cached timestamps");
                    record_cache_hit();
                    return Ok(Arc::clone(&entry.timestamps));
                }
                debug!(area = %area, "Cached timestamps expired");
            }
        }

        info!(area = %area, "Fetching new timestamps");
        record_cache_miss();

        let all = self.source.fetch_capabilities(area.config()).await?;
        let timestamps: Arc<[String]> = recent_frames(all, self.frame_count).into();

        let mut entries = self.entries.write().await;
        entries.insert(
            area,
            CacheEntry {
                timestamps: Arc::clone(&timestamps),
                refreshed_at: Utc::now(),
                expiry: Instant::now().checked_add(self.ttl),
            },
        );

        Ok(timestamps)
    }

    /// Status of every cached area, expired entries included.
    pub async fn snapshot(&self) -> Vec<CacheEntryStatus> {
        let entries = self.entries.read().await;
        let now = Instant::now();

        let mut status: Vec<CacheEntryStatus> = entries
            .iter()
            .map(|(area, entry)| CacheEntryStatus {
                area: *area,
                frames: entry.timestamps.len(),
                latest: entry.timestamps.last().cloned(),
                refreshed_at: entry.refreshed_at,
                expires_in_secs: entry
                    .expiry
                    .map(|expiry| expiry.saturating_duration_since(now).as_secs()),
            })
            .collect();
        status.sort_by_key(|s| s.area);
        status
    }
}

/// Keep the last `count` entries of a chronologically ascending list.
fn recent_frames(mut all: Vec<String>, count: usize) -> Vec<String> {
    let start = all.len().saturating_sub(count);
    all.split_off(start)
}
