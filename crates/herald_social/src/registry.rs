//! Platform to publisher routing.

use herald_core::Platform;
use herald_error::{HttpError, PublishError, PublishErrorKind};
use herald_interface::PlatformPublisher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::{FacebookPublisher, InstagramPublisher, LinkedInPublisher};

/// Publishers keyed by the platform they serve.
#[derive(Clone, Default)]
pub struct PublisherRegistry {
    publishers: HashMap<Platform, Arc<dyn PlatformPublisher>>,
}

impl std::fmt::Debug for PublisherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut platforms: Vec<_> = self.publishers.keys().collect();
        platforms.sort();
        f.debug_struct("PublisherRegistry")
            .field("platforms", &platforms)
            .finish()
    }
}

impl PublisherRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Facebook, Instagram and LinkedIn publishers.
    pub fn with_defaults(timeout: Duration) -> Result<Self, HttpError> {
        let mut registry = Self::new();
        registry
            .register(FacebookPublisher::new(timeout)?)
            .register(InstagramPublisher::new(timeout)?)
            .register(LinkedInPublisher::new(timeout)?);
        Ok(registry)
    }

    /// Register a publisher, replacing any previous one for its platform.
    pub fn register<P: PlatformPublisher + 'static>(&mut self, publisher: P) -> &mut Self {
        self.register_arc(Arc::new(publisher))
    }

    /// Register a shared publisher.
    pub fn register_arc(&mut self, publisher: Arc<dyn PlatformPublisher>) -> &mut Self {
        let platform = publisher.platform();
        tracing::debug!(%platform, "Registering publisher");
        self.publishers.insert(platform, publisher);
        self
    }

    /// Publisher for a platform.
    pub fn get(&self, platform: Platform) -> Result<&Arc<dyn PlatformPublisher>, PublishError> {
        self.publishers.get(&platform).ok_or_else(|| {
            PublishError::new(PublishErrorKind::Unsupported {
                platform: platform.to_string(),
                content_type: "any".to_string(),
            })
        })
    }

    /// Number of registered publishers.
    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}
