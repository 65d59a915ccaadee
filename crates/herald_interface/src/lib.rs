//! Trait definitions for Herald.
//!
//! The seams between the scheduler, the media pipeline and the outside
//! world: persistence, platform publishing, credential decryption and
//! generation services.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cipher;
mod generation;
mod in_memory;
mod publisher;
mod repository;

pub use cipher::TokenCipher;
pub use generation::{GeneratedImage, ImageGenerator, VideoGenerator};
pub use in_memory::InMemoryContentRepository;
pub use publisher::{PlatformPublisher, PostId, PublishTarget};
pub use repository::ContentRepository;
