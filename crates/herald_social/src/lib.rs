//! Social platform publishers for Herald.
//!
//! Each platform adapter implements [`herald_interface::PlatformPublisher`]:
//! - [`FacebookPublisher`] - page feed, photo and video posts
//! - [`InstagramPublisher`] - container-based feed images, stories and reels
//! - [`LinkedInPublisher`] - UGC posts with registered media uploads
//!
//! [`PublisherRegistry`] routes a platform to its adapter, and
//! [`FernetCipher`] decrypts the access tokens stored on linked accounts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cipher;
mod facebook;
mod graph;
mod instagram;
mod linkedin;
mod registry;

pub use cipher::{ENCRYPTION_KEY_VAR, FernetCipher};
pub use facebook::FacebookPublisher;
pub use graph::{DEFAULT_TIMEOUT, GRAPH_API_BASE, GraphClient, GraphRequest, created_id};
pub use instagram::{
    ContainerStatus, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, InstagramPublisher,
};
pub use linkedin::{
    LINKEDIN_API_BASE, LinkedInMedia, LinkedInPublisher, RegisteredUpload, person_urn,
    register_upload_body, ugc_post_body,
};
pub use registry::PublisherRegistry;
