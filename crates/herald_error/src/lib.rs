//! Error types for the Herald workspace.
//!
//! This crate provides the foundation error types used by every Herald crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use herald_error::{HeraldResult, HttpError};
//!
//! fn fetch_data() -> HeraldResult<String> {
//!     Err(HttpError::new("together", "connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod content;
mod database;
mod error;
mod generation;
mod http;
mod media;
mod publish;
mod retry;
mod schedule;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use content::{ContentError, ContentErrorKind};
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{HeraldError, HeraldErrorKind, HeraldResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use media::{MediaError, MediaErrorKind};
pub use publish::{PublishError, PublishErrorKind};
pub use retry::RetryableError;
pub use schedule::ScheduleError;
pub use storage::{StorageError, StorageErrorKind};
