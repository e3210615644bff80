use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, info};
use profile_model::ApiResponse;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

/// Non-success HTTP status reported by the backend
///
/// Wrapped in [`anyhow::Error`] by the client; adapters downcast to it to
/// map statuses onto their typed errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Request failed with status {status}: {message}")]
pub struct ApiStatusError {
    pub status: StatusCode,
    pub message: String,
}

/// API client with bearer-token authentication
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    api_version: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid server URL: {base_url}"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            api_version: "v1".to_string(),
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Build a versioned API URL
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        let path = p.trim_start_matches('/');
        if path.starts_with("api/") {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/api/{}/{}", self.base_url, self.api_version, path)
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the authentication token
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// Get the current authentication token
    pub async fn get_token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Build a request with authentication headers
    pub async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    /// Execute a request whose envelope must carry data
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => {
                let api_response: ApiResponse<T> = response.json().await?;
                match api_response.data {
                    Some(data) => Ok(data),
                    None => Err(anyhow::anyhow!(
                        "Empty response from server: {}",
                        api_response.error.unwrap_or_default()
                    )),
                }
            }
            status => Err(self.status_error(status, response).await),
        }
    }

    /// Execute a request where only the status matters
    async fn execute_no_content(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::ACCEPTED => {
                Ok(())
            }
            status => Err(self.status_error(status, response).await),
        }
    }

    async fn status_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> anyhow::Error {
        if status == StatusCode::UNAUTHORIZED {
            self.set_token(None).await;
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        debug!("[ApiClient] {} -> {}", status, message);

        ApiStatusError { status, message }.into()
    }

    /// GET request with authentication
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.get(&url)).await;
        self.execute_request(request).await
    }

    /// PUT a JSON body, ignoring any response payload
    pub async fn put_no_content<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<()> {
        let url = self.build_url(path);
        let request =
            self.build_request(self.client.put(&url).json(body)).await;
        self.execute_no_content(request).await
    }

    /// PUT raw bytes with the given content type
    pub async fn put_bytes(
        &self,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let url = self.build_url(path);
        let request = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        let request = self.build_request(request).await;
        self.execute_no_content(request).await
    }

    /// POST without a body for endpoints that return no content
    pub async fn post_no_content(&self, path: &str) -> Result<()> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.post(&url)).await;
        self.execute_no_content(request).await
    }
}
