use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{post_json, GatewayError, ModelCompletion, ModelGateway};

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
const MAX_NEW_TOKENS: u32 = 500;
/// Returned when the provider answers successfully but generates nothing.
pub const EMPTY_GENERATION_FALLBACK: &str = "No feedback received.";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    // Without this the prompt (and the CV inside it) is echoed back ahead of the completion.
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

fn first_generation(generations: Vec<Generation>) -> String {
    generations
        .into_iter()
        .next()
        .and_then(|g| g.generated_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| EMPTY_GENERATION_FALLBACK.to_string())
}

/// Hugging Face Inference API backend (text-generation models).
pub struct HuggingFaceGateway {
    client: Client,
    token: Option<String>,
    model: String,
}

impl HuggingFaceGateway {
    pub fn new(token: Option<String>, model: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout)?,
            token,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{HF_INFERENCE_URL}/{}", self.model)
    }
}

#[async_trait]
impl ModelGateway for HuggingFaceGateway {
    async fn complete(&self, prompt: &str) -> Result<ModelCompletion, GatewayError> {
        let token = self
            .token
            .as_deref()
            .ok_or(GatewayError::MissingCredential {
                variable: "HF_TOKEN",
            })?;

        let request_body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                return_full_text: false,
            },
        };

        let response = post_json(
            &self.client,
            &self.endpoint(),
            token,
            &request_body,
            self.provider(),
        )
        .await?;
        let generations: Vec<Generation> = response.json().await?;

        Ok(ModelCompletion::new(first_generation(generations)))
    }

    fn provider(&self) -> &'static str {
        "Hugging Face"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_generation_text_is_used() {
        let generations: Vec<Generation> =
            serde_json::from_str(r#"[{"generated_text": "Spelling & Grammar: fine."}]"#).unwrap();
        assert_eq!(first_generation(generations), "Spelling & Grammar: fine.");
    }

    #[test]
    fn test_empty_generation_falls_back() {
        assert_eq!(first_generation(vec![]), EMPTY_GENERATION_FALLBACK);

        let generations: Vec<Generation> = serde_json::from_str(r#"[{}]"#).unwrap();
        assert_eq!(first_generation(generations), EMPTY_GENERATION_FALLBACK);
    }

    #[test]
    fn test_endpoint_includes_model_path() {
        let gateway = HuggingFaceGateway::new(
            Some("hf_token".to_string()),
            "HuggingFaceH4/zephyr-7b-alpha".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            gateway.endpoint(),
            "https://api-inference.huggingface.co/models/HuggingFaceH4/zephyr-7b-alpha"
        );
    }

    #[test]
    fn test_request_disables_prompt_echo() {
        let body = InferenceRequest {
            inputs: "prompt",
            parameters: InferenceParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                return_full_text: false,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["parameters"]["return_full_text"], false);
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let gateway =
            HuggingFaceGateway::new(None, "m".to_string(), Duration::from_secs(1)).unwrap();
        let err = gateway.complete("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::MissingCredential { variable: "HF_TOKEN" }
        ));
    }
}
