//! Core LLM client trait, error type, and a scripted mock

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{CompletionRequest, CompletionResponse, Usage};

/// Stateless LLM client - each call is independent
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Timeout(_))
    }
}

/// Scripted client for tests and offline runs.
///
/// Models listed with `with_failure` always fail; models with a scripted
/// reply return it; anything else gets the default reply, or fails when
/// there is none. Every request is recorded.
#[derive(Debug)]
pub struct MockLlmClient {
    replies: HashMap<String, String>,
    failures: HashSet<String>,
    default_reply: Option<String>,
    usage: Usage,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Mock that answers every model with "mock response"
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            failures: HashSet::new(),
            default_reply: Some("mock response".to_string()),
            usage: Usage::default(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Mock where every model fails
    pub fn failing() -> Self {
        Self {
            default_reply: None,
            ..Self::new()
        }
    }

    /// Reply used for models without a scripted entry
    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    /// Script a reply for one model
    pub fn with_reply(mut self, model: impl Into<String>, reply: impl Into<String>) -> Self {
        self.replies.insert(model.into(), reply.into());
        self
    }

    /// Make one model always fail
    pub fn with_failure(mut self, model: impl Into<String>) -> Self {
        self.failures.insert(model.into());
        self
    }

    /// Token usage reported with every successful reply
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of `complete` calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request.model.clone();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if self.failures.contains(&model) {
            return Err(LlmError::Api {
                status: 503,
                message: format!("{} unavailable", model),
            });
        }

        let content = self
            .replies
            .get(&model)
            .or(self.default_reply.as_ref())
            .cloned()
            .ok_or_else(|| LlmError::Network(format!("no route to {}", model)))?;

        Ok(CompletionResponse {
            content,
            model,
            usage: self.usage.clone(),
        })
    }
}
