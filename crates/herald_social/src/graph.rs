//! Minimal Graph API client shared by the Facebook and Instagram publishers.

use herald_error::{HttpError, PublishError, PublishErrorKind};
use serde_json::Value;
use std::time::Duration;

/// Graph API root, pinned to v22.0.
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v22.0";

/// Default timeout for platform requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A form-encoded Graph API call, built before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GraphRequest {
    /// Path relative to the API root, without leading slash
    path: String,
    /// Form fields, excluding the access token
    params: Vec<(String, String)>,
}

impl GraphRequest {
    /// Start a request against `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Add a form field.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Value of a form field, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP client for `graph.facebook.com`.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
}

impl GraphClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::client_build("graph", e))?;
        Ok(Self {
            client,
            base_url: GRAPH_API_BASE.to_string(),
        })
    }

    /// Override the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL for a request path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST the request as a form and return the JSON body.
    pub async fn post(&self, request: &GraphRequest, token: &str) -> Result<Value, PublishError> {
        let mut form = request.params.clone();
        form.push(("access_token".to_string(), token.to_string()));

        let response = self
            .client
            .post(self.url(&request.path))
            .form(&form)
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;
        read_json(response).await
    }

    /// GET the request with its fields as query parameters.
    pub async fn get(&self, request: &GraphRequest, token: &str) -> Result<Value, PublishError> {
        let mut query = request.params.clone();
        query.push(("access_token".to_string(), token.to_string()));

        let response = self
            .client
            .get(self.url(&request.path))
            .query(&query)
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, PublishError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PublishError::new(PublishErrorKind::Rejected {
            status_code: status.as_u16(),
            message,
        }));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| PublishError::new(PublishErrorKind::UnexpectedResponse(e.to_string())))
}

/// Extract the created object's id (`id`, or `post_id` for photo posts).
pub fn created_id(body: &Value) -> Result<String, PublishError> {
    ["id", "post_id"]
        .iter()
        .find_map(|key| match body.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            PublishError::new(PublishErrorKind::UnexpectedResponse(format!(
                "response has no id: {}",
                body
            )))
        })
}
