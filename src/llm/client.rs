//! Async chat-completions client for agent decisions
//!
//! Talks to any OpenAI-compatible endpoint (OpenRouter by default, also
//! DeepSeek, OpenAI, local servers).

use crate::core::error::{Result, SimError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "tngtech/deepseek-r1t2-chimera:free";
const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Token budget for a plain reply
const REPLY_TOKENS: u32 = 1024;
/// Reasoning models spend most of their budget before the answer
const REASONING_REPLY_TOKENS: u32 = 8192;

pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(api_key: String, endpoint: String, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            endpoint,
            model,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY (OPENROUTER_API_KEY is accepted as a fallback)
    /// Optional: LLM_API_URL, LLM_MODEL
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("OPENROUTER_API_KEY"))
            .map_err(|_| SimError::LlmError("LLM_API_KEY not set".into()))?;
        let endpoint = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Ok(Self::new(api_key, endpoint, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn reply_budget(&self) -> u32 {
        if self.model.contains("r1") || self.model.contains("reasoner") {
            REASONING_REPLY_TOKENS
        } else {
            REPLY_TOKENS
        }
    }

    /// Build the request body for one system + user exchange
    fn chat_request(&self, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.reply_budget(),
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: system.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        }
    }

    /// Send one exchange and return the model's text reply
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.chat_request(system, user))
            .send()
            .await
            .map_err(|e| SimError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SimError::LlmError(format!("API error {}: {}", status, body)));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| SimError::LlmError(e.to_string()))?;

        reply.into_text()
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    // Some providers send null when the whole budget went to reasoning
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| SimError::LlmError("Empty response".into()))
    }
}
