//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use herald_error::{DatabaseError, DatabaseErrorKind};

/// Pooled PostgreSQL connections.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

fn database_url() -> DatabaseResult<String> {
    std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })
}

/// Establish a single connection to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable to determine the connection string.
///
/// # Errors
///
/// Returns an error if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub fn establish_connection() -> DatabaseResult<PgConnection> {
    let database_url = database_url()?;
    PgConnection::establish(&database_url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Build a connection pool for `database_url`.
///
/// Connections are checked out per repository call and returned when the
/// call finishes.
///
/// # Errors
///
/// Returns an error if the pool cannot open its initial connections.
#[tracing::instrument(skip(database_url))]
pub fn establish_pool(database_url: &str, max_size: u32) -> DatabaseResult<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;
    tracing::info!(max_size, "Database pool ready");
    Ok(pool)
}

/// Build a connection pool from the `DATABASE_URL` environment variable.
pub fn pool_from_env(max_size: u32) -> DatabaseResult<DbPool> {
    establish_pool(&database_url()?, max_size)
}
