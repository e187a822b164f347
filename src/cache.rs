//! Shared cache of the "recent links" feed.
//!
//! Clones share the same entries through `Arc<RwLock<>>`. Entries expire after
//! the configured TTL, and every successful link generation calls
//! [`RecentLinksCache::invalidate`] so the next read goes back to the backend.
//!
//! A feed fetched before an invalidation must not be stored after it. Readers
//! take [`RecentLinksCache::generation`] before their request and hand it back
//! to [`RecentLinksCache::store`], which drops the feed if the generation moved.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::types::LinkGenerationRecord;

#[derive(Clone)]
pub struct RecentLinksCache {
    inner: Arc<RwLock<CacheInner>>,
    ttl: Duration,
}

struct CacheInner {
    /// Keyed by the requested limit.
    feeds: HashMap<u32, CachedFeed>,
    /// Bumped on every invalidation.
    generation: u64,
}

struct CachedFeed {
    records: Vec<LinkGenerationRecord>,
    fetched_at: Instant,
}

impl CachedFeed {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

impl RecentLinksCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                feeds: HashMap::new(),
                generation: 0,
            })),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached records for `limit`, if still fresh.
    pub async fn get(&self, limit: u32) -> Option<Vec<LinkGenerationRecord>> {
        let cache = self.inner.read().await;
        cache
            .feeds
            .get(&limit)
            .filter(|feed| feed.is_fresh(self.ttl))
            .map(|feed| feed.records.clone())
    }

    /// Current invalidation generation.
    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Store a feed fetched while the cache was at `generation`.
    ///
    /// Returns false when the feed was dropped because an invalidation
    /// happened in the meantime.
    pub async fn store(
        &self,
        limit: u32,
        generation: u64,
        records: Vec<LinkGenerationRecord>,
    ) -> bool {
        if self.ttl.is_zero() {
            return false;
        }

        let mut cache = self.inner.write().await;
        if cache.generation != generation {
            tracing::debug!("Dropping recent-links feed fetched before an invalidation");
            return false;
        }
        cache.feeds.retain(|_, feed| feed.is_fresh(self.ttl));
        cache.feeds.insert(
            limit,
            CachedFeed {
                records,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every cached feed.
    pub async fn invalidate(&self) {
        let mut cache = self.inner.write().await;
        if !cache.feeds.is_empty() {
            tracing::info!("Invalidating {} cached recent-links feed(s)", cache.feeds.len());
        }
        cache.feeds.clear();
        cache.generation += 1;
    }
}

impl Default for RecentLinksCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
