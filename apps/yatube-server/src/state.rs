//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{Cache, MediaStorage, TokenService};
use yatube_core::services::{
    AccountService, ContentStore, FeedCache, FeedComposer, FollowService, GroupService, Paginator,
    SubmissionService,
};
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryContentStore, JwtTokenService, LocalMediaStorage,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub feeds: FeedComposer,
    pub feed_cache: FeedCache,
    pub submissions: SubmissionService,
    pub follows: FollowService,
    pub groups: GroupService,
    pub accounts: AccountService,
    /// Which content store is serving requests, reported by the health check.
    pub store_backend: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (store, store_backend) = content_store(config).await;
        let cache = cache(config).await;

        if let Err(e) = tokio::fs::create_dir_all(&config.media_root).await {
            tracing::error!(root = %config.media_root.display(), error = %e, "Cannot create media root");
        }
        let media: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(config.media_root.clone()));

        let state = Self::assemble(store, store_backend, cache, media, config);
        tracing::info!(store = store_backend, "Application state initialized");
        state
    }

    /// Wire the services over already-built adapters.
    pub fn assemble(
        store: ContentStore,
        store_backend: &'static str,
        cache: Arc<dyn Cache>,
        media: Arc<dyn MediaStorage>,
        config: &AppConfig,
    ) -> Self {
        let feed_cache = FeedCache::new(cache, config.index_cache_ttl);
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        Self {
            feeds: FeedComposer::new(store.clone(), Paginator::new(config.posts_per_page)),
            submissions: SubmissionService::new(store.clone(), media, feed_cache.clone()),
            follows: FollowService::new(store.clone()),
            groups: GroupService::new(store.clone()),
            accounts: AccountService::new(
                store.users.clone(),
                Arc::new(Argon2PasswordService::new()),
                tokens,
            ),
            feed_cache,
            store_backend,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        self.accounts.tokens()
    }
}

fn in_memory_store() -> ContentStore {
    Arc::new(InMemoryContentStore::new()).into_content_store()
}

#[cfg(feature = "postgres")]
async fn content_store(config: &AppConfig) -> (ContentStore, &'static str) {
    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (in_memory_store(), "memory");
    };

    match yatube_infra::database::connect(db_config).await {
        Ok(conn) => (yatube_infra::postgres_content_store(conn), "postgres"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            (in_memory_store(), "memory")
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn content_store(_config: &AppConfig) -> (ContentStore, &'static str) {
    tracing::info!("Running without postgres feature - using in-memory store");
    (in_memory_store(), "memory")
}

#[cfg(feature = "redis")]
async fn cache(config: &AppConfig) -> Arc<dyn Cache> {
    use yatube_infra::{RedisCache, RedisConfig};

    let Some(url) = config.redis_url.clone() else {
        return Arc::new(InMemoryCache::new());
    };

    let redis_config = RedisConfig {
        url,
        ..RedisConfig::from_env()
    };
    match RedisCache::new(redis_config).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            tracing::error!(error = %e, "Redis unavailable. Using in-memory feed cache.");
            Arc::new(InMemoryCache::new())
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn cache(_config: &AppConfig) -> Arc<dyn Cache> {
    Arc::new(InMemoryCache::new())
}
