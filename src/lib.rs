//! Toolchat - a chat assistant about AI tools
//!
//! Answers general AI questions, questions about one catalog tool, or
//! comparisons of several tools. The tool catalog is cached locally and
//! refreshed once per calendar day; per-tool system prompts are generated by
//! the model once and cached. Every model call fails over across a shuffled
//! list of candidate models.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod locale;
pub mod prompt;
pub mod storage;

pub use error::{Result, ToolchatError};
