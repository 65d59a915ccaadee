//! Downloads of generated media and logos.

use herald_error::{HeraldResult, HttpError, MediaError, MediaErrorKind};
use std::time::Duration;

/// Fetches remote (`http(s)://`) or local (`file://`) media with a bounded timeout.
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    client: reqwest::Client,
}

impl MediaFetcher {
    /// Fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> HeraldResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::client_build("media download", e))?;
        Ok(Self { client })
    }

    /// Fetch the bytes behind `url`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> HeraldResult<Vec<u8>> {
        let download_error = |reason: String| {
            MediaError::new(MediaErrorKind::Download {
                url: url.to_string(),
                reason,
            })
        };

        if let Some(path) = url.strip_prefix("file://") {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| download_error(e.to_string()))?;
            return Ok(bytes);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {}", status.as_u16())).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;
        tracing::debug!(size = bytes.len(), "Downloaded media");
        Ok(bytes.to_vec())
    }
}
