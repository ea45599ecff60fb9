use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{post_json, GatewayError, ModelCompletion, ModelGateway};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, or an empty completion when the provider sent none.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// OpenAI Chat Completions backend.
pub struct OpenAiGateway {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiGateway {
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout)?,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn complete(&self, prompt: &str) -> Result<ModelCompletion, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential {
                variable: "OPENAI_API_KEY",
            })?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = post_json(
            &self.client,
            OPENAI_API_URL,
            api_key,
            &request_body,
            self.provider(),
        )
        .await?;
        let chat: ChatResponse = response.json().await?;

        Ok(ModelCompletion::new(chat.into_text()))
    }

    fn provider(&self) -> &'static str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_takes_first_choice_content() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"score\": 80}"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text(), "{\"score\": 80}");
    }

    #[test]
    fn test_chat_response_without_choices_is_empty_completion() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"id": "chatcmpl-2"}"#).unwrap();
        assert_eq!(parsed.into_text(), "");
    }

    #[test]
    fn test_chat_response_null_content_is_empty_completion() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text(), "");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "review this",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 500);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let gateway =
            OpenAiGateway::new(None, "gpt-4o-mini".to_string(), Duration::from_secs(1)).unwrap();
        let err = gateway.complete("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::MissingCredential {
                variable: "OPENAI_API_KEY"
            }
        ));
    }
}
