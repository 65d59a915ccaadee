//! Object storage for rendered Herald media.
//!
//! Rendered frames and post-processed videos are uploaded once and referenced
//! by URL afterwards. Two backends implement [`ObjectStorage`]:
//!
//! - [`CloudinaryStorage`] - signed uploads to Cloudinary, returns `secure_url`
//! - [`FileSystemStorage`] - local directory, for development and tests
//!
//! Uploads go through [`upload_with_retry`], which retries transient failures
//! with exponential backoff.
//!
//! # Example
//!
//! ```no_run
//! use herald_storage::{FileSystemStorage, ObjectStorage, ResourceType};
//!
//! # async fn example() -> herald_error::HeraldResult<()> {
//! let storage = FileSystemStorage::new("/tmp/herald-media", None)?;
//! let stored = storage.upload(b"png bytes", "frame_1", ResourceType::Image).await?;
//! println!("{}", stored.url());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cloudinary;
mod filesystem;
mod resource;
mod retry;
mod storage;

pub use cloudinary::{CLOUDINARY_API_BASE, CloudinaryStorage, sign_params};
pub use filesystem::FileSystemStorage;
pub use resource::{ResourceType, StoredObject};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use storage::{ObjectStorage, upload_with_retry};

// Re-export error types for convenience
pub use herald_error::{StorageError, StorageErrorKind};
