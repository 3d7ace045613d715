/// LLM Client — the single point of entry for all chat-completion calls.
///
/// No other module may call the LLM endpoint directly.
/// Endpoint and model are fixed; only the API key comes from storage.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub mod prompts;

use prompts::{build_prompt, fallback_answer, GENERIC_ANSWER, SYSTEM_PROMPT};

const CHAT_COMPLETIONS_URL: &str = "https://api.sambanova.ai/v1/chat/completions";
/// The model used for every call.
pub const MODEL: &str = "Llama-4-Maverick-17B-128E-Instruct";
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;
const PROBE_MAX_TOKENS: u32 = 10;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned no choices")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first completion, trimmed.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Anything that can answer an application question. The engine only sees this trait.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Always yields some answer; failures degrade to canned text.
    async fn generate_answer(&self, question: &str, context: &str) -> String;
}

/// Builds the shared HTTP client. Each call is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Chat-completion client bound to one API key.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Makes one call to the endpoint. No retries: a failure is the caller's to absorb.
    pub async fn call(
        &self,
        prompt: &str,
        system: Option<&str>,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Result<ChatResponse, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request_body = ChatRequest {
            model: MODEL,
            messages,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }

    /// Asks one application question, with optional extra context.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String, LlmError> {
        let prompt = build_prompt(question, context);
        let response = self
            .call(&prompt, Some(SYSTEM_PROMPT), MAX_TOKENS, Some(TEMPERATURE))
            .await?;
        response
            .text()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Probes the key with a tiny request. True when any completion comes back.
    pub async fn test_connection(&self) -> bool {
        match self.call("Say hello", None, PROBE_MAX_TOKENS, None).await {
            Ok(response) => !response.choices.is_empty(),
            Err(e) => {
                warn!("LLM connection test failed: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl AnswerGenerator for LlmClient {
    async fn generate_answer(&self, question: &str, context: &str) -> String {
        if self.api_key.trim().is_empty() {
            warn!("No LLM API key provided");
            return GENERIC_ANSWER.to_string();
        }

        match self.ask(question, context).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error calling LLM API: {e}");
                fallback_answer(question).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_takes_first_choice_trimmed() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  Yes \n"}},
                {"message": {"role": "assistant", "content": "No"}}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), Some("Yes"));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 1);
    }

    #[test]
    fn test_chat_response_without_choices_has_no_text() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "Question: Why us?",
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: Some(TEMPERATURE),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], MODEL);
        assert_eq!(value["max_tokens"], 300);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Question: Why us?");
        assert!(value["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_probe_body_omits_temperature() {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "Say hello",
            }],
            max_tokens: PROBE_MAX_TOKENS,
            temperature: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("temperature").is_none());
        assert_eq!(value["max_tokens"], 10);
    }

    #[tokio::test]
    async fn test_blank_key_returns_generic_answer_without_network() {
        let client = build_http_client(Duration::from_secs(1)).unwrap();
        let llm = LlmClient::new(client, "  ".to_string());
        let answer = llm.generate_answer("Why do you want this job?", "").await;
        assert_eq!(answer, GENERIC_ANSWER);
    }
}
