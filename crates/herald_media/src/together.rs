//! Together AI image generation client.

use async_trait::async_trait;
use base64::Engine;
use herald_error::{GenerationError, GenerationErrorKind, HeraldResult};
use herald_interface::{GeneratedImage, ImageGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default Together API host.
pub const TOGETHER_API_BASE: &str = "https://api.together.xyz";

/// Default text-to-image model.
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell-Free";

/// Image generation request body.
#[derive(Debug, Clone, Serialize, derive_getters::Getters)]
pub struct ImageGenerationRequest {
    /// Model identifier
    model: String,
    /// Prompt text
    prompt: String,
    /// Diffusion steps
    steps: u32,
    /// Number of images
    n: u32,
}

/// One generated image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDatum {
    /// Hosted image URL
    pub url: Option<String>,
    /// Inline base64 image
    pub b64_json: Option<String>,
}

/// Image generation response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    /// Generated images
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

impl ImageGenerationResponse {
    /// First usable image in the response.
    ///
    /// # Errors
    ///
    /// `EmptyOutput` when there is no image with a URL or payload.
    pub fn first_image(&self) -> Result<GeneratedImage, GenerationError> {
        let first = self
            .data
            .first()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyOutput))?;

        if let Some(url) = first.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(GeneratedImage::Url(url.to_string()));
        }

        match first.b64_json.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map(GeneratedImage::Bytes)
                .map_err(|e| {
                    GenerationError::new(GenerationErrorKind::Base64Decode(e.to_string()))
                }),
            None => Err(GenerationError::new(GenerationErrorKind::EmptyOutput)),
        }
    }
}

/// Together AI text-to-image client.
#[derive(Clone)]
pub struct TogetherImageClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    steps: u32,
}

impl std::fmt::Debug for TogetherImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogetherImageClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl TogetherImageClient {
    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all)]
    pub fn with_api_key(
        api_key: impl Into<String>,
        model: impl Into<String>,
        steps: u32,
        timeout: Duration,
    ) -> HeraldResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Api(e.to_string())))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: TOGETHER_API_BASE.to_string(),
            model: model.into(),
            steps,
        })
    }

    /// Creates a client reading `TOGETHER_API_KEY` from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(skip_all)]
    pub fn from_env(model: impl Into<String>, steps: u32, timeout: Duration) -> HeraldResult<Self> {
        let api_key = std::env::var("TOGETHER_API_KEY").map_err(|_| {
            GenerationError::new(GenerationErrorKind::MissingApiKey(
                "TOGETHER_API_KEY".to_string(),
            ))
        })?;
        Self::with_api_key(api_key, model, steps, timeout)
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request body for `prompt`.
    pub fn request_for(&self, prompt: &str) -> ImageGenerationRequest {
        ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            steps: self.steps,
            n: 1,
        }
    }
}

#[async_trait]
impl ImageGenerator for TogetherImageClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_image(&self, prompt: &str) -> HeraldResult<GeneratedImage> {
        let url = format!("{}/v1/images/generations", self.base_url);
        debug!(url = %url, "Sending image generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_for(prompt))
            .send()
            .await
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Api(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::Http {
                status_code,
                message,
            })
            .into());
        }

        let body: ImageGenerationResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Api(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        Ok(body.first_image()?)
    }
}
