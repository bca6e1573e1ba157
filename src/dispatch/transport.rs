//! The `Transport` seam and its HTTP implementation.
//!
//! [`HttpTransport`] talks to the Gemini REST API.  All connection details
//! come from [`ServiceConfig`]; the API key is resolved once at
//! construction and never changes afterwards.

use std::time::Duration;

use async_trait::async_trait;

use super::error::{DispatchError, ServiceFailure};
use super::wire::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::config::ServiceConfig;

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// One request/response exchange with the generative service.
///
/// Implementors must be `Send + Sync` so a single instance can serve
/// concurrent invocations behind an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, DispatchError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Calls `POST {base_url}/v1beta/models/{model}:generateContent`.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build from service settings, resolving the API key.
    ///
    /// Fails with [`DispatchError::Configuration`] when no key is available.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, DispatchError> {
        let api_key = config.resolve_api_key()?;
        Self::new(config.base_url.clone(), api_key, config.timeout())
    }

    /// Build with explicit connection details.
    ///
    /// `timeout` bounds the whole HTTP exchange.  A default client is used
    /// as a last-resort fallback if the builder fails.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, DispatchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DispatchError::Configuration("API key is empty".into()));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DispatchError::Configuration("service base URL is empty".into()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, DispatchError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            log::warn!("service returned HTTP {status} for model {model}");
            return Err(ServiceFailure::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        serde_json::from_str(&body)
            .map_err(|e| DispatchError::from(ServiceFailure::Malformed(e.to_string())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
