//! Stored object descriptors.

/// Kind of object being stored.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ResourceType {
    /// Still images (PNG)
    #[display("image")]
    Image,
    /// Videos (MP4)
    #[display("video")]
    Video,
}

impl ResourceType {
    /// Path segment used by storage backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
        }
    }

    /// File extension for objects of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ResourceType::Image => "png",
            ResourceType::Video => "mp4",
        }
    }

    /// MIME type for objects of this kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResourceType::Image => "image/png",
            ResourceType::Video => "video/mp4",
        }
    }
}

/// A stored object and its public URL.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StoredObject {
    /// Publicly reachable URL
    url: String,
    /// Backend object key
    public_id: String,
    /// Kind of object
    resource_type: ResourceType,
    /// Size in bytes
    size_bytes: u64,
}

impl StoredObject {
    /// Describe a stored object.
    pub fn new(
        url: impl Into<String>,
        public_id: impl Into<String>,
        resource_type: ResourceType,
        size_bytes: u64,
    ) -> Self {
        Self {
            url: url.into(),
            public_id: public_id.into(),
            resource_type,
            size_bytes,
        }
    }
}
