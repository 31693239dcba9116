//! Error types for Toolchat
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur in Toolchat
#[derive(Debug, Error)]
pub enum ToolchatError {
    /// Remote catalog could not be fetched or parsed
    #[error("Catalog fetch error: {0}")]
    CatalogFetch(String),

    /// A single candidate model failed
    #[error("Model {model} failed: {source}")]
    ModelCall {
        model: String,
        #[source]
        source: LlmError,
    },

    /// Every configured candidate model failed
    #[error("All models failed after {attempts} attempt(s)")]
    AllModelsFailed { attempts: usize },

    /// Local cache file could not be read or written
    #[error("Cache IO error: {0}")]
    CacheIo(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Toolchat operations
pub type Result<T> = std::result::Result<T, ToolchatError>;
