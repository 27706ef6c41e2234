use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use yatube_core::services::ContentStore;

use super::postgres_repo::{
    PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Configuration for the content database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Open the connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let conn = Database::connect(opts).await?;
    tracing::info!(pool = config.max_connections, "Database connected");
    Ok(conn)
}

/// Every repository backed by the same pool.
pub fn postgres_content_store(conn: DbConn) -> ContentStore {
    let conn = Arc::new(conn);

    ContentStore {
        users: Arc::new(PostgresUserRepository::shared(Arc::clone(&conn))),
        groups: Arc::new(PostgresGroupRepository::shared(Arc::clone(&conn))),
        posts: Arc::new(PostgresPostRepository::shared(Arc::clone(&conn))),
        comments: Arc::new(PostgresCommentRepository::shared(Arc::clone(&conn))),
        follows: Arc::new(PostgresFollowRepository::shared(conn)),
    }
}
