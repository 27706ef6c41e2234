//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`:
//! content stores, caches, media storage and authentication.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `redis` - Redis-backed cache

pub mod cache;
pub mod database;
pub mod media;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::InMemoryContentStore;
pub use media::{InMemoryMediaStorage, LocalMediaStorage};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, postgres_content_store};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
