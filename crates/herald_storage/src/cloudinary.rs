//! Cloudinary signed-upload backend.

use crate::{ObjectStorage, ResourceType, StoredObject};
use herald_error::{HeraldResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Default Cloudinary API host.
pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Timeout applied to uploads.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Sign upload parameters.
///
/// Parameters are sorted by name, joined as `k=v` with `&`, suffixed with the
/// API secret and hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    bytes: Option<u64>,
}

/// Cloudinary storage backend.
///
/// Credentials come from the environment (`CLOUDINARY_CLOUD_NAME`,
/// `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`).
#[derive(Clone)]
pub struct CloudinaryStorage {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for CloudinaryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryStorage")
            .field("api_base", &self.api_base)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl CloudinaryStorage {
    /// Create a backend from explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns error if any credential is empty or the HTTP client cannot be built.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> HeraldResult<Self> {
        let cloud_name = cloud_name.into();
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        for (name, value) in [
            ("cloud_name", &cloud_name),
            ("api_key", &api_key),
            ("api_secret", &api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(StorageError::new(StorageErrorKind::InvalidConfig(format!(
                    "Cloudinary {} is empty",
                    name
                )))
                .into());
            }
        }

        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| StorageError::new(StorageErrorKind::InvalidConfig(e.to_string())))?;

        Ok(Self {
            client,
            api_base: CLOUDINARY_API_BASE.to_string(),
            cloud_name,
            api_key,
            api_secret,
        })
    }

    /// Create a backend from `CLOUDINARY_*` environment variables.
    pub fn from_env() -> HeraldResult<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| {
                StorageError::new(StorageErrorKind::InvalidConfig(format!("{} not set", name)))
            })
        };
        Self::new(
            var("CLOUDINARY_CLOUD_NAME")?,
            var("CLOUDINARY_API_KEY")?,
            var("CLOUDINARY_API_SECRET")?,
        )
    }

    /// Point the backend at a different API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Upload endpoint for a resource type.
    pub fn upload_url(&self, resource_type: ResourceType) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.api_base,
            self.cloud_name,
            resource_type.as_str()
        )
    }

    fn timestamp() -> String {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for CloudinaryStorage {
    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len(), resource_type = %resource_type))]
    async fn upload(
        &self,
        data: &[u8],
        public_id: &str,
        resource_type: ResourceType,
    ) -> HeraldResult<StoredObject> {
        let timestamp = Self::timestamp();
        let signature = sign_params(
            &[
                ("overwrite", "true"),
                ("public_id", public_id),
                ("timestamp", &timestamp),
            ],
            &self.api_secret,
        );

        let file = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(format!("{}.{}", public_id, resource_type.extension()))
            .mime_str(resource_type.mime_type())
            .map_err(|e| StorageError::new(StorageErrorKind::InvalidConfig(e.to_string())))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", public_id.to_string())
            .text("overwrite", "true")
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url(resource_type))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Transient(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Cloudinary rejected upload");
            return Err(StorageError::new(StorageErrorKind::Upload {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Transient(e.to_string())))?;

        let url = body
            .secure_url
            .ok_or_else(|| StorageError::new(StorageErrorKind::MissingUrl(public_id.to_string())))?;

        tracing::info!(url = %url, "Uploaded to Cloudinary");
        Ok(StoredObject::new(
            url,
            public_id,
            resource_type,
            body.bytes.unwrap_or(data.len() as u64),
        ))
    }

    #[tracing::instrument(skip(self))]
    async fn download(&self, url: &str) -> HeraldResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Transient(e.to_string())))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::new(StorageErrorKind::NotFound(url.to_string())).into());
        }
        if !status.is_success() {
            return Err(StorageError::new(StorageErrorKind::Upload {
                status_code: status.as_u16(),
                message: format!("download of {} failed", url),
            })
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Transient(e.to_string())))?;
        Ok(bytes.to_vec())
    }
}
