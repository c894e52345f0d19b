//! OpenAI-compatible chat completion client.

use crate::error::{Result, TranslateError};
use async_trait::async_trait;
use blog_kit_core::TranslationConfig;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Longest error body echoed back in a service error
const MAX_ERROR_BODY: usize = 500;

/// One system instruction plus one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
}

/// Anything that turns an instruction and a message into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Connection settings for the text-generation service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build from blog.toml settings and the process environment.
    pub fn from_env(config: &TranslationConfig) -> Result<Self> {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Build from blog.toml settings and an arbitrary variable lookup.
    ///
    /// The API key is required; base URL and model variables override the
    /// configured values.
    pub fn from_lookup(
        config: &TranslationConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(TranslateError::MissingCredentials)?;

        Ok(Self {
            api_key,
            base_url: non_empty(BASE_URL_VAR).unwrap_or_else(|| config.base_url.clone()),
            model: non_empty(MODEL_VAR).unwrap_or_else(|| config.model.clone()),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat completion client
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| TranslateError::Service("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
            model: config.model,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: self.temperature,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            chars = request.user.chars().count(),
            "sending chat completion"
        );

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TranslateError::Service(format!(
                "HTTP {}: {}",
                status,
                error_message(&text)
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        extract_content(parsed)
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn extract_content(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(TranslateError::EmptyResponse);
    }
    Ok(content)
}

/// Pull the message out of an API error body, falling back to the raw text
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) {
        return parsed.error.message;
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = TranslationConfig::default();
        let result = ClientConfig::from_lookup(&config, lookup(&[]));
        assert!(matches!(result, Err(TranslateError::MissingCredentials)));

        let result = ClientConfig::from_lookup(&config, lookup(&[(API_KEY_VAR, "  ")]));
        assert!(matches!(result, Err(TranslateError::MissingCredentials)));
    }

    #[test]
    fn test_environment_overrides_config() {
        let config = TranslationConfig::default();
        let client = ClientConfig::from_lookup(
            &config,
            lookup(&[
                (API_KEY_VAR, "sk-test"),
                (BASE_URL_VAR, "http://localhost:8000/v1/"),
                (MODEL_VAR, "local-model"),
            ]),
        )
        .unwrap();
        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.model, "local-model");
        assert_eq!(
            chat_endpoint(&client.base_url),
            "http://localhost:8000/v1/chat/completions"
        );

        let client = ClientConfig::from_lookup(&config, lookup(&[(API_KEY_VAR, "k")])).unwrap();
        assert_eq!(client.model, config.model);
        assert_eq!(client.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "translate",
                },
                ChatMessage {
                    role: "user",
                    content: "hello",
                },
            ],
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_extract_content() {
        let ok: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"こんにちは"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(ok).unwrap(), "こんにちは");

        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":"  \n"}}]}"#,
        ] {
            let parsed: ChatResponse = serde_json::from_str(body).unwrap();
            assert!(matches!(
                extract_content(parsed),
                Err(TranslateError::EmptyResponse)
            ));
        }
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Invalid API key","type":"auth"}}"#),
            "Invalid API key"
        );
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
        assert_eq!(error_message(&"x".repeat(2000)).len(), MAX_ERROR_BODY);
    }
}
