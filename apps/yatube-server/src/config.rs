//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use yatube_core::services::{FeedCache, Paginator};
use yatube_infra::JwtConfig;

#[cfg(feature = "postgres")]
use yatube_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis_url: Option<String>,
    pub posts_per_page: usize,
    pub index_cache_ttl: Duration,
    pub media_root: PathBuf,
    pub jwt: JwtConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            #[cfg(feature = "postgres")]
            database: None,
            #[cfg(feature = "redis")]
            redis_url: None,
            posts_per_page: Paginator::DEFAULT_PER_PAGE,
            index_cache_ttl: FeedCache::DEFAULT_TTL,
            media_root: PathBuf::from("media"),
            jwt: JwtConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            #[cfg(feature = "postgres")]
            database,
            #[cfg(feature = "redis")]
            redis_url: env::var("REDIS_URL").ok(),
            posts_per_page: parse_var("POSTS_PER_PAGE").unwrap_or(defaults.posts_per_page),
            index_cache_ttl: parse_var("INDEX_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.index_cache_ttl),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparsable environment variable");
            None
        }
    }
}
