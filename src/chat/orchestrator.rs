//! Conversation orchestrator - turns a question into one model call

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::history::prepare_history;
use super::selection::ToolSelection;
use crate::catalog::{Catalog, CatalogStore, Tool};
use crate::config::Config;
use crate::gateway::ModelGateway;
use crate::llm::{LlmClient, Message, Usage};
use crate::locale::Language;
use crate::prompt::templates;
use crate::prompt::{PromptCache, PromptSynthesizer};

/// Per-question limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatSettings {
    pub max_history_messages: usize,
    pub max_output_tokens: u32,
    pub language: Language,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_history_messages: 5,
            max_output_tokens: 2024,
            language: Language::default(),
        }
    }
}

/// Answers questions about general AI topics or specific catalog tools
#[derive(Debug)]
pub struct Orchestrator {
    gateway: Arc<ModelGateway>,
    synthesizer: PromptSynthesizer,
    catalog: Catalog,
    catalog_store: Option<CatalogStore>,
    catalog_day: Option<NaiveDate>,
    settings: ChatSettings,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<ModelGateway>,
        synthesizer: PromptSynthesizer,
        catalog: Catalog,
        settings: ChatSettings,
    ) -> Self {
        Self {
            gateway,
            synthesizer,
            catalog,
            catalog_store: None,
            catalog_day: None,
            settings,
        }
    }

    /// Keep the catalog in step with `store`, see [`sync_catalog`](Self::sync_catalog)
    pub fn with_catalog_store(mut self, store: CatalogStore) -> Self {
        self.catalog_store = Some(store);
        self.catalog_day = None;
        self
    }

    /// Wire the gateway, prompt cache and synthesizer from configuration
    pub fn from_config(config: &Config, client: Arc<dyn LlmClient>, catalog: Catalog) -> Self {
        let settings = ChatSettings {
            max_history_messages: config.chat.max_history_messages,
            max_output_tokens: config.llm.max_output_tokens,
            language: config.chat.language,
        };
        let gateway = Arc::new(ModelGateway::new(client, config.llm.models.clone()));
        let cache = PromptCache::new(config.prompts_path()).with_max_age_days(config.prompts.max_age_days);
        let synthesizer = PromptSynthesizer::new(
            gateway.clone(),
            cache,
            settings.max_output_tokens,
            settings.language,
        );
        Self::new(gateway, synthesizer, catalog, settings)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load the catalog through the store if it has not been loaded today.
    ///
    /// Returns whether a load happened. Without a store this does nothing.
    pub async fn sync_catalog(&mut self) -> bool {
        self.sync_catalog_on(Local::now().date_naive()).await
    }

    /// [`sync_catalog`](Self::sync_catalog) with an explicit "today"
    pub async fn sync_catalog_on(&mut self, today: NaiveDate) -> bool {
        let Some(store) = &self.catalog_store else {
            return false;
        };
        if self.catalog_day == Some(today) {
            return false;
        }

        self.catalog = store.load_catalog_on(today).await;
        self.catalog_day = Some(today);
        log::info!("Catalog for {} has {} tools", today, self.catalog.len());
        true
    }

    /// Tokens spent by every answered model call so far
    pub fn usage(&self) -> Usage {
        self.gateway.total_usage()
    }

    pub fn synthesizer(&self) -> &PromptSynthesizer {
        &self.synthesizer
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Answer `question` under `selection`, given the prior conversation.
    ///
    /// Always returns text: when no model answers, the localized apology.
    pub async fn ask(&self, selection: &ToolSelection, question: &str, history: &[Message]) -> String {
        let messages = self.build_messages(selection, question, history).await;
        log::info!(
            "Asking about {} ({} messages)",
            selection.describe(self.settings.language),
            messages.len()
        );

        match self
            .gateway
            .send(messages, selection.temperature(), self.settings.max_output_tokens)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                log::error!("No answer for question: {}", e);
                self.settings.language.apology().to_string()
            }
        }
    }

    /// Full message list for one question: system prompt, forwarded history, then the question
    pub async fn build_messages(
        &self,
        selection: &ToolSelection,
        question: &str,
        history: &[Message],
    ) -> Vec<Message> {
        let language = self.settings.language;

        let (system, user) = match selection {
            ToolSelection::GeneralOnly => (
                templates::general_system_prompt(language),
                templates::general_question(question),
            ),
            ToolSelection::SingleTool(name) => {
                let tool = self.catalog.find(name);
                if tool.is_none() {
                    log::warn!("Tool {} not in catalog, prompting from name only", name);
                }
                let tool_prompt = self.synthesizer.get_or_create_prompt(name, tool).await;
                (
                    templates::single_tool_system_prompt(name, tool, &tool_prompt, language),
                    templates::single_tool_question(name, question),
                )
            }
            ToolSelection::MultiTool { names, include_general } => {
                let (found, missing) = self.split_known(names);
                if !missing.is_empty() {
                    log::warn!("Tools not in catalog: {}", missing.join(", "));
                }
                (
                    templates::multi_tool_system_prompt(
                        names,
                        &found,
                        &missing,
                        *include_general,
                        language,
                    ),
                    templates::multi_tool_question(names, question),
                )
            }
        };

        let mut messages = vec![Message::system(system)];
        messages.extend(prepare_history(history, self.settings.max_history_messages));
        messages.push(Message::user(user));
        messages
    }

    fn split_known<'a>(&'a self, names: &'a [String]) -> (Vec<&'a Tool>, Vec<&'a str>) {
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            match self.catalog.find(name) {
                Some(tool) => found.push(tool),
                None => missing.push(name.as_str()),
            }
        }
        (found, missing)
    }
}
