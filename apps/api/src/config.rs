use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

/// Which model provider backs the review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    HuggingFace,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "huggingface" | "hf" => Ok(Provider::HuggingFace),
            other => Err(anyhow!(
                "LLM_PROVIDER must be 'openai' or 'huggingface', got '{other}'"
            )),
        }
    }
}

/// Shape of a successful review response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// `{ feedback: string }` carrying the raw completion.
    Unstructured,
    /// `{ score, summary, feedback: [..], raw }`.
    Structured,
}

impl FromStr for ResponseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" => Ok(ResponseMode::Structured),
            "unstructured" | "raw" => Ok(ResponseMode::Unstructured),
            other => Err(anyhow!(
                "REVIEW_MODE must be 'structured' or 'unstructured', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// Provider credentials are optional here: a missing key is reported per request
/// as a configuration error rather than refusing to boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub provider: Provider,
    pub mode: ResponseMode,
    pub min_text_length: usize,
    pub llm_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub hf_token: Option<String>,
    pub hf_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            provider: parse_env("LLM_PROVIDER", Provider::OpenAi)?,
            mode: parse_env("REVIEW_MODE", ResponseMode::Structured)?,
            min_text_length: parse_env("REVIEW_MIN_TEXT_LENGTH", 20usize)
                .context("REVIEW_MIN_TEXT_LENGTH must be a non-negative integer")?,
            llm_timeout: llm_timeout(
                parse_env("LLM_TIMEOUT_SECS", 30u64)
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            )?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            hf_token: optional_env("HF_TOKEN"),
            hf_model: std::env::var("HF_MODEL")
                .unwrap_or_else(|_| "HuggingFaceH4/zephyr-7b-alpha".to_string()),
        })
    }

    /// Name of the selected provider's credential variable, if it is unset.
    pub fn missing_credential(&self) -> Option<&'static str> {
        match self.provider {
            Provider::OpenAi if self.openai_api_key.is_none() => Some("OPENAI_API_KEY"),
            Provider::HuggingFace if self.hf_token.is_none() => Some("HF_TOKEN"),
            _ => None,
        }
    }
}

/// A zero timeout would fail every review, so it is rejected at startup.
fn llm_timeout(secs: u64) -> Result<Duration> {
    if secs == 0 {
        bail!("LLM_TIMEOUT_SECS must be at least 1 second");
    }
    Ok(Duration::from_secs(secs))
}

/// Reads `key`, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("Invalid value for environment variable '{key}'")),
        None => Ok(default),
    }
}
