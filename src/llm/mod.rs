//! LLM Client Layer - chat-completion API integration
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - GroqClient implementation
//! - MockLlmClient for tests and offline runs

pub mod client;
pub mod groq;
pub mod types;

pub use client::{LlmClient, LlmError, MockLlmClient};
pub use groq::{GroqClient, GroqConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, Usage};
