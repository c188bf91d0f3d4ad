//! Script cache module
//!
//! Keeps successful upstream bodies for a fixed TTL regardless of the
//! upstream's own cache headers. Failures are never stored.

use std::collections::HashMap;
use std::time::Duration;

use hyper::body::Bytes;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// How a script request was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the script cache
    Hit,
    /// Fetched from upstream
    Miss,
}

impl CacheStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

struct CachedScript {
    body: Bytes,
    fetched_at: Instant,
}

/// TTL cache keyed by upstream URL
pub struct ScriptCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedScript>>,
}

impl ScriptCache {
    /// A zero TTL disables caching
    pub fn new(ttl_secs: u32) -> Self {
        Self {
            ttl: Duration::from_secs(u64::from(ttl_secs)),
            entries: RwLock::new(HashMap::new()),
        }
    }

    const fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh body for `url`, if any
    pub async fn get(&self, url: &str) -> Option<Bytes> {
        if !self.enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(url)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.body.clone())
    }

    pub async fn insert(&self, url: &str, body: Bytes) {
        if !self.enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        entries.insert(
            url.to_string(),
            CachedScript {
                body,
                fetched_at: Instant::now(),
            },
        );
    }
}
