//! Chat Completions Oracle
//!
//! HTTP adapter for OpenAI-compatible `/chat/completions` endpoints
//! (DeepSeek, OpenAI, local gateways). One request per alert, JSON mode,
//! no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ClassifierOracle, OracleError};
use crate::logic::alert::OracleResponse;

pub const SYSTEM_PROMPT: &str = concat!(
    "You are a cybersecurity expert working as a SOC analyst assistant. ",
    "Classify the security alert as TP (True Positive) or FP (False Positive) ",
    "and assign a Priority: Low, Medium, High or Critical. ",
    "Always respond in this exact JSON format:",
    r#"{"id": "alert_id", "classification": "TP or FP", "#,
    r#""priority": "Low/Medium/High/Critical", "justification": "short explanation"}"#,
);

/// Adapter configuration
#[derive(Debug, Clone)]
pub struct OracleClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

pub struct ChatCompletionsOracle {
    config: OracleClientConfig,
    http_client: reqwest::Client,
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatCompletionsOracle {
    pub fn new(config: OracleClientConfig) -> Result<Self, OracleError> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::NotConfigured("ORACLE_API_KEY is empty".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| OracleError::NotConfigured(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ClassifierOracle for ChatCompletionsOracle {
    async fn classify(&self, _description: &str, payload: &Value) -> Result<OracleResponse, OracleError> {
        // The payload already carries the rule description
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: payload.to_string() },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self.http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.config.timeout_seconds)
                } else {
                    OracleError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(OracleError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::ServerError { status: status.as_u16(), body });
        }

        let chat: ChatResponse = response.json().await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        let content = chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::ParseError("response has no message content".to_string()))?;

        parse_content(&content)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// Parse the model's message content into a response.
///
/// Tolerates a fenced ```json block around the object.
pub fn parse_content(content: &str) -> Result<OracleResponse, OracleError> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let value: Value = serde_json::from_str(body)
        .map_err(|e| OracleError::ParseError(format!("content is not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(OracleError::ParseError("content is not a JSON object".to_string()));
    }

    serde_json::from_value(value).map_err(|e| OracleError::ParseError(e.to_string()))
}
