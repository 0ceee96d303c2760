use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::CacheConfig;
use crate::error::Error;
use crate::handlers::ChainClient;
use crate::registry::{EdgeKey, Query, Registry};

/// Trait for metric sources (live chain APIs, test doubles, etc.).
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Compute the label for a bound query.
    async fn compute(&self, query: &Query) -> Result<String, Error>;
}

/// Resolves edge labels, serving repeated requests from a TTL cache.
///
/// Concurrent misses for the same edge are not coalesced: each one queries
/// upstream and the last to finish wins the cache slot.
pub struct Resolver<S = ChainClient> {
    registry: Registry,
    source: S,
    cache: Mutex<TtlCache<EdgeKey, String>>,
}

impl<S: MetricSource> Resolver<S> {
    pub fn new(registry: Registry, source: S, cache: CacheConfig) -> Self {
        Self::with_clock(registry, source, cache, Arc::new(SystemClock))
    }

    pub fn with_clock(
        registry: Registry,
        source: S,
        cache: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            source,
            cache: Mutex::new(TtlCache::new(cache, clock)),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Label for `source_id -> target_id`.
    ///
    /// `Ok(None)` means no query is registered for the edge. Errors from the
    /// metric source are returned as-is and nothing is cached for them.
    pub async fn resolve(&self, source_id: &str, target_id: &str) -> Result<Option<String>, Error> {
        let key = EdgeKey::new(source_id, target_id);

        let cached = self.cache.lock().get(&key);
        if let Some(label) = cached {
            debug!(edge = %key, "cache hit");
            return Ok(Some(label));
        }

        let Some(query) = self.registry.get(&key) else {
            return Ok(None);
        };

        debug!(edge = %key, kind = query.kind(), "cache miss");
        let label = self.source.compute(query).await?;
        self.cache.lock().insert(key, label.clone());
        Ok(Some(label))
    }
}
