use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use crate::error::{AppError, Result};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

pub fn create_pool(database_path: &str) -> std::result::Result<DbPool, r2d2::Error> {
    let path = database_path
        .strip_prefix("sqlite:")
        .unwrap_or(database_path);

    let manager = if path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(Path::new(path))
    };

    // A memory database lives and dies with its connection, so it gets exactly one
    let max_size = if path == ":memory:" { 1 } else { 5 };

    Pool::builder().max_size(max_size).build(manager)
}

pub fn create_memory_pool() -> std::result::Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::memory();
    Pool::builder().max_size(1).build(manager)
}

/// Check a connection out of the pool and run `f` on the blocking thread pool.
///
/// The connection goes back to the pool when `f` returns, whether it succeeded
/// or not.
pub async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut DbConnection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}
