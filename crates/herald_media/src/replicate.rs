//! Replicate video generation client.

use async_trait::async_trait;
use herald_error::{GenerationError, GenerationErrorKind, HeraldResult};
use herald_interface::VideoGenerator;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default Replicate API host.
pub const REPLICATE_API_BASE: &str = "https://api.replicate.com";

/// Default text-to-video model.
pub const DEFAULT_VIDEO_MODEL: &str = "minimax/video-01";

/// A prediction as reported by Replicate.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    /// Prediction id
    pub id: String,
    /// `starting`, `processing`, `succeeded`, `failed` or `canceled`
    pub status: String,
    /// Model output, a URL or list of URLs once succeeded
    #[serde(default)]
    pub output: serde_json::Value,
    /// Failure detail
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl Prediction {
    /// True once the prediction can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    /// Output URL of a finished prediction.
    ///
    /// # Errors
    ///
    /// `PredictionFailed` for failed or canceled predictions, `EmptyOutput`
    /// when a successful prediction carries no URL.
    pub fn output_url(&self) -> Result<String, GenerationError> {
        if self.status != "succeeded" {
            let reason = self
                .error
                .as_ref()
                .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                .unwrap_or_else(|| self.status.clone());
            return Err(GenerationError::new(GenerationErrorKind::PredictionFailed {
                id: self.id.clone(),
                reason,
            }));
        }

        let url = match &self.output {
            serde_json::Value::String(url) => Some(url.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|v| v.as_str().map(str::to_string)),
            _ => None,
        };

        url.filter(|u| !u.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyOutput))
    }
}

/// Replicate text-to-video client with bounded polling.
#[derive(Clone)]
pub struct ReplicateVideoClient {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
    model: String,
    poll_interval: Duration,
    max_wait: Duration,
}

impl std::fmt::Debug for ReplicateVideoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateVideoClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("poll_interval", &self.poll_interval)
            .field("max_wait", &self.max_wait)
            .finish_non_exhaustive()
    }
}

impl ReplicateVideoClient {
    /// Creates a client with an explicit token.
    pub fn with_api_token(
        api_token: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> HeraldResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Api(e.to_string())))?;

        Ok(Self {
            client,
            api_token: api_token.into(),
            base_url: REPLICATE_API_BASE.to_string(),
            model: model.into(),
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(600),
        })
    }

    /// Creates a client reading `REPLICATE_API_TOKEN` from the environment.
    pub fn from_env(model: impl Into<String>, timeout: Duration) -> HeraldResult<Self> {
        let api_token = std::env::var("REPLICATE_API_TOKEN").map_err(|_| {
            GenerationError::new(GenerationErrorKind::MissingApiKey(
                "REPLICATE_API_TOKEN".to_string(),
            ))
        })?;
        Self::with_api_token(api_token, model, timeout)
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the polling cadence and bound.
    pub fn with_polling(mut self, poll_interval: Duration, max_wait: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.max_wait = max_wait;
        self
    }

    async fn read_prediction(&self, response: reqwest::Response) -> HeraldResult<Prediction> {
        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::Http {
                status_code,
                message,
            })
            .into());
        }
        let prediction = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Api(format!(
                "Failed to parse prediction: {}",
                e
            )))
        })?;
        Ok(prediction)
    }

    async fn create_prediction(&self, prompt: &str) -> HeraldResult<Prediction> {
        let url = format!("{}/v1/models/{}/predictions", self.base_url, self.model);
        debug!(url = %url, "Creating prediction");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "input": { "prompt": prompt } }))
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Api(e.to_string())))?;
        self.read_prediction(response).await
    }

    async fn get_prediction(&self, id: &str) -> HeraldResult<Prediction> {
        let url = format!("{}/v1/predictions/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Api(e.to_string())))?;
        self.read_prediction(response).await
    }
}

#[async_trait]
impl VideoGenerator for ReplicateVideoClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_video(&self, prompt: &str) -> HeraldResult<String> {
        let mut prediction = self.create_prediction(prompt).await?;
        let started = tokio::time::Instant::now();

        while !prediction.is_terminal() {
            if started.elapsed() >= self.max_wait {
                warn!(id = %prediction.id, "Prediction polling exceeded its bound");
                return Err(GenerationError::new(GenerationErrorKind::Timeout {
                    id: prediction.id.clone(),
                    seconds: self.max_wait.as_secs(),
                })
                .into());
            }
            tokio::time::sleep(self.poll_interval).await;
            prediction = self.get_prediction(&prediction.id).await?;
            debug!(id = %prediction.id, status = %prediction.status, "Polled prediction");
        }

        let url = prediction.output_url()?;
        info!(id = %prediction.id, "Video generated");
        Ok(url)
    }
}
