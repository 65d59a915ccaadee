//! Core domain types for Herald.
//!
//! Platforms, post formats, content lifecycle states and the records the
//! scheduler and media pipeline operate on.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod company;
mod content;
mod content_type;
mod platform;
mod status;

pub use artifact::ArtifactName;
pub use company::{Company, LinkedAccount, Strategy};
pub use content::{ContentItem, ContentItemBuilder, ContentItemBuilderError, is_http_url};
pub use content_type::{ContentType, MediaField};
pub use platform::Platform;
pub use status::{ContentStatus, StrategyStatus};
