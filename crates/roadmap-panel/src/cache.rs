//! View-data caching using moka
//!
//! Wraps store implementations so repeated unforced queries for the same
//! selector are served from memory:
//! - `force: false` returns the cached list, fetching on a miss
//! - `force: true` always fetches and refreshes the entry
//! - mutations pass straight through and invalidate the cache

use crate::config::CacheConfig;
use crate::error::ServiceError;
use crate::services::{RoadmapStore, ScenarioStore};
use crate::types::{LoadOptions, Roadmap, Scenario, ScenarioId, SelectorOptions};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

fn build_cache<V>(config: CacheConfig) -> Cache<SelectorOptions, Arc<Vec<V>>>
where
    V: Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(config.max_capacity)
        .time_to_live(config.ttl())
        .build()
}

/// Scenario store with cached selector queries
#[derive(Debug)]
pub struct CachingScenarioStore<S> {
    inner: S,
    cache: Cache<SelectorOptions, Arc<Vec<Scenario>>>,
}

impl<S: ScenarioStore> CachingScenarioStore<S> {
    /// Wrap `inner` with a cache sized by `config`
    #[must_use]
    pub fn new(inner: S, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: build_cache(config),
        }
    }

    /// Current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        CacheStats {
            entry_count: self.cache.entry_count(),
        }
    }

    /// Drop every cached scenario list
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<S: ScenarioStore> ScenarioStore for CachingScenarioStore<S> {
    async fn find_by_roadmap_selector(
        &self,
        selector: &SelectorOptions,
        options: LoadOptions,
    ) -> Result<Vec<Scenario>, ServiceError> {
        if options.force {
            let fresh = self.inner.find_by_roadmap_selector(selector, options).await?;
            self.cache
                .insert(selector.clone(), Arc::new(fresh.clone()))
                .await;
            return Ok(fresh);
        }

        let cached = self
            .cache
            .try_get_with(selector.clone(), async {
                tracing::trace!(entity = %selector.entity_reference, "scenario cache miss");
                self.inner
                    .find_by_roadmap_selector(selector, options)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())?;
        Ok(cached.as_ref().clone())
    }

    async fn clone_by_id(
        &self,
        id: ScenarioId,
        new_name: &str,
    ) -> Result<Scenario, ServiceError> {
        let cloned = self.inner.clone_by_id(id, new_name).await?;
        self.cache.invalidate_all();
        Ok(cloned)
    }
}

/// Roadmap store with cached selector queries
#[derive(Debug)]
pub struct CachingRoadmapStore<R> {
    inner: R,
    cache: Cache<SelectorOptions, Arc<Vec<Roadmap>>>,
}

impl<R: RoadmapStore> CachingRoadmapStore<R> {
    /// Wrap `inner` with a cache sized by `config`
    #[must_use]
    pub fn new(inner: R, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: build_cache(config),
        }
    }

    /// Current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        CacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

#[async_trait]
impl<R: RoadmapStore> RoadmapStore for CachingRoadmapStore<R> {
    async fn find_roadmaps_by_selector(
        &self,
        selector: &SelectorOptions,
    ) -> Result<Vec<Roadmap>, ServiceError> {
        let cached = self
            .cache
            .try_get_with(selector.clone(), async {
                self.inner
                    .find_roadmaps_by_selector(selector)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())?;
        Ok(cached.as_ref().clone())
    }
}
