//! Bounded-lifetime cache for rendered pages of the global feed.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::DomainError;
use crate::ports::Cache;

const KEY_PREFIX: &str = "index_page:";

/// Rendered global-feed pages, kept for at most `ttl` and dropped wholesale
/// whenever a post changes.
///
/// A render that overlaps an [`invalidate`](Self::invalidate) in this process
/// is returned but not stored. Invalidations issued by other processes sharing
/// the backend are only seen through the TTL.
#[derive(Clone)]
pub struct FeedCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
    generation: Arc<AtomicU64>,
}

impl FeedCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(20);

    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(page: usize) -> String {
        format!("{KEY_PREFIX}{page}")
    }

    /// Serve the cached body for `page`, or render, store and return it.
    pub async fn get_or_render<F, Fut>(&self, page: usize, render: F) -> Result<String, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        let key = Self::key(page);
        if let Some(body) = self.cache.get(&key).await {
            tracing::debug!(page, "Global feed served from cache");
            return Ok(body);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let body = render().await?;
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(page, "Feed changed while rendering, not caching");
            return Ok(body);
        }
        if let Err(e) = self.cache.set(&key, &body, Some(self.ttl)).await {
            tracing::warn!(page, error = %e, "Failed to cache global feed page");
        }
        Ok(body)
    }

    /// Drop every cached page.
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        match self.cache.delete_prefix(KEY_PREFIX).await {
            Ok(removed) => tracing::debug!(removed, "Global feed cache invalidated"),
            Err(e) => tracing::error!(error = %e, "Failed to invalidate global feed cache"),
        }
    }
}
