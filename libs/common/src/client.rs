//! HTTP client shared by the resource services
//!
//! Wraps `reqwest` with the deployment base URL and a shared bearer-token
//! slot. Once the auth service installs a token, every request carries an
//! `Authorization: Bearer` header. Timeouts are left to `reqwest`.

use std::sync::Arc;

use anyhow::Result;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::error::{ApiError, ApiResult};

/// Configuration for the remote API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined to
    pub base_url: String,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BASE_URL`: Base URL of the remote API (default: "http://localhost:8000/api")
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".to_string());

        Ok(ApiConfig { base_url })
    }
}

/// HTTP client with automatic bearer authorization
///
/// Clones share one token slot, so a login through the auth service
/// authorizes the requests of every service holding a clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<watch::Sender<Option<String>>>,
}

impl ApiClient {
    /// Create a new client for the configured API. No token is installed
    /// until a login succeeds.
    pub fn new(config: &ApiConfig) -> Self {
        let (token, _rx) = watch::channel(None);
        ApiClient {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: Arc::new(token),
        }
    }

    /// Install or clear the bearer token used for subsequent requests.
    pub fn set_bearer_token(&self, token: Option<String>) {
        self.token.send_replace(token);
    }

    /// Currently installed bearer token.
    pub fn bearer_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.send_request(Method::GET, path, None::<&()>).await?;
        self.decode(path, &body)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = self.send_request(Method::POST, path, Some(body)).await?;
        self.decode(path, &body)
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = self.send_request(Method::PATCH, path, Some(body)).await?;
        self.decode(path, &body)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = self.send_request(Method::PUT, path, Some(body)).await?;
        self.decode(path, &body)
    }

    /// Issue a DELETE and discard the response body.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send_request(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the request and return the response body of a success status.
    async fn send_request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<String> {
        let url = self.url(path);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), url, &body));
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(&self, path: &str, body: &str) -> ApiResult<T> {
        serde_json::from_str(body).map_err(|source| ApiError::Decode {
            url: self.url(path),
            source,
        })
    }
}
