//! Short-lived cache of reconciled arrival boards.
//!
//! Many clients poll the same few stops; caching a board for a few seconds
//! keeps the upstream request rate independent of the client count.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::seta::ArrivalResponse;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached boards.
    pub ttl: Duration,

    /// Maximum number of cached stops.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15),
            max_capacity: 1000,
        }
    }
}

/// Arrival boards keyed by stop id.
pub struct ArrivalCache {
    boards: MokaCache<String, Arc<ArrivalResponse>>,
}

impl ArrivalCache {
    pub fn new(config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { boards }
    }

    /// Return the cached board for `stop_id`, or await `fetch` for it.
    ///
    /// Degraded boards are returned but not cached, so the next request
    /// tries upstream again.
    pub async fn get_or_fetch<Fut>(&self, stop_id: &str, fetch: Fut) -> Arc<ArrivalResponse>
    where
        Fut: Future<Output = ArrivalResponse>,
    {
        if let Some(board) = self.boards.get(stop_id).await {
            trace!(stop_id, "arrival cache hit");
            return board;
        }

        let board = Arc::new(fetch.await);
        if !board.is_error() {
            self.boards.insert(stop_id.to_string(), board.clone()).await;
        }
        board
    }

    pub fn invalidate_all(&self) {
        self.boards.invalidate_all();
    }
}
