//! Groq API client implementation
//!
//! Implements the LlmClient trait against Groq's OpenAI-compatible
//! chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::llm::client::{LlmClient, LlmError};
use crate::llm::types::{CompletionRequest, CompletionResponse, Usage};

/// Groq API base URL
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "API_KEY";

/// Wait assumed when a 429 carries no usable `retry-after`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the Groq client
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_base: GROQ_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Groq API client
pub struct GroqClient {
    client: Client,
    api_key: String,
    config: GroqConfig,
}

impl GroqClient {
    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: GroqConfig) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey {
                env_var: API_KEY_ENV.to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    /// Build the request body for the chat-completions API
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": m.role.as_str(),
                    "content": m.content
                })
            })
            .collect();

        json!({
            "model": request.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false
        })
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, model: &str, body: Value) -> Result<CompletionResponse, LlmError> {
        let content = body["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))?;

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let usage = body
            .get("usage")
            .map(|u| {
                Usage::new(
                    u["prompt_tokens"].as_u64().unwrap_or(0),
                    u["completion_tokens"].as_u64().unwrap_or(0),
                )
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: content.to_string(),
            model: body["model"].as_str().unwrap_or(model).to_string(),
            usage,
        })
    }

    /// Send a request to the chat-completions endpoint
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout)
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify(status, &headers, body));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// Map a non-2xx response to an error.
///
/// 429 becomes `RateLimited`, honouring a `retry-after` given in seconds.
fn classify(status: StatusCode, headers: &HeaderMap, body: String) -> LlmError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return LlmError::RateLimited {
            retry_after: Duration::from_secs(retry_after),
        };
    }

    LlmError::Api {
        status: status.as_u16(),
        message: body,
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        log::debug!(
            "Sending {} message(s) to {} (temperature {}, max_tokens {})",
            request.messages.len(),
            request.model,
            request.temperature,
            request.max_tokens
        );
        let response = self.send_request(body).await?;
        self.parse_response(&request.model, response)
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("api_base", &self.config.api_base)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}
