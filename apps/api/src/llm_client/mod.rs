/// Model gateway: the single point of entry for every provider call in the review service.
///
/// ARCHITECTURAL RULE: No other module may call a model provider directly.
/// Handlers receive an `Arc<dyn ModelGateway>` through `AppState` and never construct one.
///
/// Calls are made exactly once. There is no retry loop here: a bad completion is
/// degraded downstream, and transport failures surface to the caller as 502.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::{Config, Provider};

pub mod huggingface;
pub mod openai;

pub use huggingface::HuggingFaceGateway;
pub use openai::OpenAiGateway;

/// Upper bound on how much of a provider error body is echoed back to callers.
const MAX_DETAIL_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Provider credential '{variable}' is not configured")]
    MissingCredential { variable: &'static str },

    #[error("Timed out waiting for the model provider")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unreadable provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Http(e)
        }
    }
}

/// A raw text completion. Opaque to the gateway and never rewritten downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCompletion {
    pub raw_text: String,
}

impl ModelCompletion {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

/// A generative-model backend. Implement this to add a provider without touching
/// the pipeline, handlers or router.
///
/// Carried in `AppState` as `Arc<dyn ModelGateway>`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends `prompt` to the provider and returns its single text completion.
    async fn complete(&self, prompt: &str) -> Result<ModelCompletion, GatewayError>;

    /// Human-readable provider label, used in logs and caller-facing error strings.
    fn provider(&self) -> &'static str;
}

/// Builds the gateway selected by `LLM_PROVIDER`.
pub fn build_gateway(config: &Config) -> Result<Arc<dyn ModelGateway>> {
    let gateway: Arc<dyn ModelGateway> = match config.provider {
        Provider::OpenAi => Arc::new(OpenAiGateway::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.llm_timeout,
        )?),
        Provider::HuggingFace => Arc::new(HuggingFaceGateway::new(
            config.hf_token.clone(),
            config.hf_model.clone(),
            config.llm_timeout,
        )?),
    };
    Ok(gateway)
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Posts `body` as JSON with a bearer token and turns any non-success status into
/// `GatewayError::Api`, logging the full provider body.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    token: &str,
    body: &B,
    provider: &str,
) -> Result<Response, GatewayError> {
    let response = client
        .post(url)
        .bearer_auth(token)
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("{provider} returned {status}: {body}");
        return Err(GatewayError::Api {
            status: status.as_u16(),
            message: provider_error_message(&body),
        });
    }

    debug!("{provider} call succeeded with {status}");
    Ok(response)
}

/// Pulls a readable message out of a provider error body.
///
/// Understands `{"error": {"message": ".."}}` (OpenAI) and `{"error": ".."}` (Hugging Face);
/// anything else is passed through. The result is capped at `MAX_DETAIL_CHARS`.
pub(crate) fn provider_error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| {
            e.get("message")
                .and_then(|m| m.as_str())
                .or_else(|| e.as_str())
        })
        .unwrap_or(body);

    message.chars().take(MAX_DETAIL_CHARS).collect()
}
