//! PostgreSQL integration for Herald.
//!
//! This crate provides the diesel schema, row models and the pooled
//! [`PostgresContentRepository`] used by the scheduler and media pipeline.
//!
//! # Features
//!
//! - Diesel-based PostgreSQL integration
//! - r2d2 connection pool, one checkout per repository call
//! - Conditional status writes inside transactions
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_database::{PostgresContentRepository, pool_from_env};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = pool_from_env(8)?;
//! let repo = PostgresContentRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod connection;
mod content_repository;
mod models;

// Public modules for external access
pub mod schema;

pub use connection::{DbPool, establish_connection, establish_pool, pool_from_env};
pub use content_repository::PostgresContentRepository;
pub use models::{CompanyRow, ContentItemRow, LinkedAccountRow, StrategyRow};

use herald_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
