//! Filesystem-based object storage for development and tests.

use crate::{ObjectStorage, ResourceType, StoredObject};
use herald_error::{HeraldResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Filesystem storage backend.
///
/// Objects are written to `{base_path}/{resource_type}/{public_id}.{ext}`.
/// URLs are `{public_base_url}/{resource_type}/{public_id}.{ext}` when a base
/// URL is configured (for a directory served by a web server), otherwise
/// `file://` URLs.
///
/// ```text
/// /var/herald/media/
/// ├── image/
/// │   └── instagram_feed_image_posts_12_20250303_090500_a1b2c3d4.png
/// └── video/
///     └── linkedin_linkedin_video_posts_12_20250303_091000_0f9e8d7c.mp4
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
    public_base_url: Option<String>,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: Option<String>,
    ) -> HeraldResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem storage");
        Ok(Self {
            base_path,
            public_base_url: public_base_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// Root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn relative_key(public_id: &str, resource_type: ResourceType) -> HeraldResult<String> {
        if public_id.is_empty()
            || public_id.contains(['/', '\\'])
            || public_id.starts_with('.')
        {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(public_id.to_string())).into());
        }
        Ok(format!(
            "{}/{}.{}",
            resource_type.as_str(),
            public_id,
            resource_type.extension()
        ))
    }

    fn url_for(&self, key: &str, path: &Path) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("file://{}", path.display()),
        }
    }

    fn path_for_url(&self, url: &str) -> HeraldResult<PathBuf> {
        let path = if let Some(local) = url.strip_prefix("file://") {
            PathBuf::from(local)
        } else if let Some(key) = self
            .public_base_url
            .as_deref()
            .and_then(|base| url.strip_prefix(base))
        {
            self.base_path.join(key.trim_start_matches('/'))
        } else {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(url.to_string())).into());
        };

        if !path.starts_with(&self.base_path) || path.components().any(|c| c.as_os_str() == "..") {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(url.to_string())).into());
        }
        Ok(path)
    }
}

#[async_trait::async_trait]
impl ObjectStorage for FileSystemStorage {
    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len(), resource_type = %resource_type))]
    async fn upload(
        &self,
        data: &[u8],
        public_id: &str,
        resource_type: ResourceType,
    ) -> HeraldResult<StoredObject> {
        let key = Self::relative_key(public_id, resource_type)?;
        let path = self.base_path.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        let url = self.url_for(&key, &path);
        tracing::info!(path = %path.display(), url = %url, "Stored object");
        Ok(StoredObject::new(url, public_id, resource_type, data.len() as u64))
    }

    #[tracing::instrument(skip(self))]
    async fn download(&self, url: &str) -> HeraldResult<Vec<u8>> {
        let path = self.path_for_url(url)?;
        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(url.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        tracing::debug!(path = %path.display(), size = data.len(), "Read object");
        Ok(data)
    }
}
