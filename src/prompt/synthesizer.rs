//! Per-tool system prompts, generated once by the model and then cached.

use std::sync::Arc;

use super::cache::PromptCache;
use super::templates::{generation_instruction, ANSWER_TEMPERATURE, GENERATION_USER_TURN};
use crate::catalog::Tool;
use crate::gateway::ModelGateway;
use crate::llm::Message;
use crate::locale::Language;

/// Produces the specialized system prompt for a tool
#[derive(Debug)]
pub struct PromptSynthesizer {
    gateway: Arc<ModelGateway>,
    cache: PromptCache,
    max_output_tokens: u32,
    language: Language,
}

impl PromptSynthesizer {
    pub fn new(
        gateway: Arc<ModelGateway>,
        cache: PromptCache,
        max_output_tokens: u32,
        language: Language,
    ) -> Self {
        Self {
            gateway,
            cache,
            max_output_tokens,
            language,
        }
    }

    pub fn cache(&self) -> &PromptCache {
        &self.cache
    }

    /// Cached prompt for `tool_name`, or a freshly generated one.
    ///
    /// `tool` is the catalog entry when the catalog knows the name. Never
    /// fails: when no model answers, an expired cached prompt is reused if
    /// there is one, otherwise a localized placeholder. Nothing is cached.
    pub async fn get_or_create_prompt(&self, tool_name: &str, tool: Option<&Tool>) -> String {
        if let Some(prompt) = self.cache.get(tool_name) {
            log::debug!("Using cached prompt for {}", tool_name);
            return prompt;
        }

        log::info!(
            "Generating prompt for {} ({})",
            tool_name,
            if tool.is_some() { "catalog metadata" } else { "name only" }
        );
        let messages = vec![
            Message::system(generation_instruction(tool_name, tool, self.language)),
            Message::user(GENERATION_USER_TURN),
        ];

        match self
            .gateway
            .send(messages, ANSWER_TEMPERATURE, self.max_output_tokens)
            .await
        {
            Ok(prompt) => {
                if let Err(e) = self.cache.put(tool_name, &prompt) {
                    log::warn!("Failed to cache prompt for {}: {}", tool_name, e);
                }
                prompt
            }
            Err(e) => {
                log::error!("Prompt generation for {} failed: {}", tool_name, e);
                match self.cache.get_any(tool_name) {
                    Some(stale) => {
                        log::warn!("Reusing expired prompt for {}", tool_name);
                        stale
                    }
                    None => self.language.basic_info(tool_name),
                }
            }
        }
    }
}
