//! Upstream module
//!
//! Fetches scripts from the remote repository through the script cache.

pub mod cache;
pub mod fetcher;

use std::sync::Arc;

pub use cache::{CacheStatus, ScriptCache};
pub use fetcher::{FetchOutcome, HttpFetcher, ScriptFetcher};

/// Cache-fronted script fetcher
pub struct ScriptSource {
    fetcher: Arc<dyn ScriptFetcher>,
    cache: ScriptCache,
}

impl ScriptSource {
    pub fn new(fetcher: Arc<dyn ScriptFetcher>, cache_ttl: u32) -> Self {
        Self {
            fetcher,
            cache: ScriptCache::new(cache_ttl),
        }
    }

    /// Cached body if fresh, otherwise a single upstream fetch
    pub async fn load(&self, url: &str) -> (FetchOutcome, CacheStatus) {
        if let Some(body) = self.cache.get(url).await {
            return (FetchOutcome::Fetched(body), CacheStatus::Hit);
        }

        let outcome = self.fetcher.fetch(url).await;
        if let FetchOutcome::Fetched(body) = &outcome {
            self.cache.insert(url, body.clone()).await;
        }
        (outcome, CacheStatus::Miss)
    }
}
