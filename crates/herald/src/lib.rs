//! Herald - branded social content rendering and scheduled auto-posting.
//!
//! Herald turns AI-generated artwork into platform-sized branded posts and
//! publishes approved content to Facebook, Instagram and LinkedIn when its
//! scheduled slot arrives.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use herald::{HeraldConfig, build_orchestrator, build_repository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HeraldConfig::load()?;
//!     let repository = build_repository(&config)?;
//!     let orchestrator = build_orchestrator(&config, repository)?;
//!
//!     let report = orchestrator.check_due(42).await?;
//!     println!("Published {} posts", report.posted_count());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - export tracing spans through OpenTelemetry
//!
//! # Architecture
//!
//! - `herald_error` - Error types
//! - `herald_core` - Platforms, content types, statuses and records
//! - `herald_interface` - Repository, publisher, cipher and generator traits
//! - `herald_frame` - Branded frame compositing
//! - `herald_storage` - Object storage and upload retry
//! - `herald_media` - Image and video generation and post-processing
//! - `herald_database` - PostgreSQL repository
//! - `herald_social` - Platform publishers and token decryption
//! - `herald_schedule` - Schedule evaluation and the posting orchestrator
//!
//! This crate (`herald`) re-exports everything for convenience and ships
//! the `herald` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
pub mod cli;
mod config;
mod observability;

pub use app::{
    LocalFrame, build_composer, build_orchestrator, build_pipeline, build_repository,
    build_storage, compose_local_frame,
};
pub use config::{
    DatabaseConfig, HeraldConfig, HttpConfig, LoggingConfig, MediaConfig, ScheduleConfig,
    StorageBackend, StorageConfig,
};
pub use observability::{
    ObservabilityConfig, init_observability_with_config, shutdown_observability,
};

pub use herald_core::*;
pub use herald_error::*;
pub use herald_frame::*;
pub use herald_interface::*;
pub use herald_media::*;
pub use herald_schedule::*;
pub use herald_social::*;
pub use herald_storage::{
    CloudinaryStorage, FileSystemStorage, ObjectStorage, ResourceType, RetryPolicy,
    StoredObject, retry_with_backoff, upload_with_retry,
};

pub use herald_database::{DbPool, PostgresContentRepository, establish_pool, pool_from_env};
