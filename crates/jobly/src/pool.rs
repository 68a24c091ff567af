//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a database URL.
///
/// # Example
///
/// ```ignore
/// let pool = jobly::create_pool("postgresql:///jobly", 16)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(database_url: &str, max_size: usize) -> JoblyResult<Pool> {
    if max_size == 0 {
        return Err(JoblyError::Config("pool max size must be > 0".to_string()));
    }

    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))
}

/// Create a connection pool from the `[database]` section of the config.
pub fn create_pool_from_config(config: &DatabaseConfig) -> JoblyResult<Pool> {
    tracing::info!(max_size = config.pool_max_size, "creating database pool");
    create_pool(&config.url, config.pool_max_size)
}
