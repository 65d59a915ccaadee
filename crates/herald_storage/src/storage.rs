//! Storage trait definition.

use crate::{ResourceType, StoredObject};
use herald_error::HeraldResult;

/// Trait for pluggable object storage backends.
///
/// Rendered media is uploaded under its artifact name and referenced by
/// public URL from then on.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Store `data` under `public_id` and return its public URL.
    ///
    /// Uploading the same `public_id` twice overwrites the object.
    async fn upload(
        &self,
        data: &[u8],
        public_id: &str,
        resource_type: ResourceType,
    ) -> HeraldResult<StoredObject>;

    /// Fetch the bytes behind a URL previously returned by `upload`.
    async fn download(&self, url: &str) -> HeraldResult<Vec<u8>>;
}

/// Upload with exponential backoff on transient failures.
///
/// Rejections (4xx other than 408/429) fail immediately.
#[tracing::instrument(skip(storage, data), fields(backend = storage.backend_name(), size = data.len()))]
pub async fn upload_with_retry(
    storage: &dyn ObjectStorage,
    policy: crate::RetryPolicy,
    data: &[u8],
    public_id: &str,
    resource_type: ResourceType,
) -> HeraldResult<StoredObject> {
    crate::retry_with_backoff(policy, "upload", || {
        storage.upload(data, public_id, resource_type)
    })
    .await
}
