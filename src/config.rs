//! Configuration for Toolchat.
//!
//! Loaded once at startup from `--config`, `./.toolchat.yml` or
//! `~/.config/toolchat/toolchat.yml`, then overridden from the environment.
//! Components receive the pieces they need through their constructors.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::locale::Language;

/// Default candidate models
pub const DEFAULT_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama3-70b-8192"];

/// Default remote catalog address
pub const DEFAULT_CATALOG_URL: &str = "https://thewitcher-sagi-ai-tools.static.hf.space/tools.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding tools.json, tools_prompts.json and config.json
    pub data_dir: PathBuf,
    pub llm: LlmConfig,
    pub catalog: CatalogConfig,
    pub prompts: PromptsConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Interchangeable candidate model identifiers
    pub models: Vec<String>,
    pub max_output_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: crate::llm::groq::GROQ_API_BASE.to_string(),
            api_key: None,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            max_output_tokens: 2024,
            timeout_ms: 60000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Regenerate cached tool prompts older than this many days (never when unset)
    pub max_age_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// History window, counted in user/assistant exchange pairs
    pub max_history_messages: usize,
    pub language: Language,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history_messages: 5,
            language: Language::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("toolchat"),
            llm: LlmConfig::default(),
            catalog: CatalogConfig::default(),
            prompts: PromptsConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain, apply the process environment, and validate
    pub fn resolve(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load(config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        let project_config = PathBuf::from(format!(".{}.yml", project_name));
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", project_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply environment overrides.
    ///
    /// The first name in each list wins; the `GROQ_*`/`AI_TOOLS_URL` names
    /// are accepted as aliases.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| -> Option<(String, String)> {
            names
                .iter()
                .find_map(|name| {
                    lookup(name)
                        .filter(|v| !v.trim().is_empty())
                        .map(|v| (name.to_string(), v))
                })
        };

        if let Some((_, key)) = first(&["API_KEY", "GROQ_API_KEY"]) {
            self.llm.api_key = Some(key.trim().to_string());
        }

        if let Some((_, models)) = first(&["MODEL_CANDIDATES", "GROQ_MODEL"]) {
            self.llm.models = parse_model_list(&models);
        }

        if let Some((name, tokens)) = first(&["MAX_OUTPUT_TOKENS", "GROQ_MAX_TOKENS"]) {
            self.llm.max_output_tokens = tokens
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{} must be a positive integer, got '{}'", name, tokens))?;
        }

        if let Some((name, history)) = first(&["MAX_HISTORY_MESSAGES"]) {
            self.chat.max_history_messages = history
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a positive integer, got '{}'", name, history))?;
        }

        if let Some((_, url)) = first(&["CATALOG_URL", "AI_TOOLS_URL"]) {
            self.catalog.url = url.trim().to_string();
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.llm.models.is_empty() {
            eyre::bail!("llm.models must name at least one model");
        }
        if self.llm.max_output_tokens == 0 {
            eyre::bail!("llm.max_output_tokens must be > 0");
        }
        if self.chat.max_history_messages == 0 {
            eyre::bail!("chat.max_history_messages must be > 0");
        }
        if self.catalog.url.trim().is_empty() {
            eyre::bail!("catalog.url must not be empty");
        }
        Ok(())
    }

    /// Local catalog cache
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("tools.json")
    }

    /// Last successful catalog refresh record
    pub fn refresh_record_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// Generated tool prompt cache
    pub fn prompts_path(&self) -> PathBuf {
        self.data_dir.join("tools_prompts.json")
    }
}

/// Split a comma-separated model list, dropping blanks and duplicates
pub fn parse_model_list(raw: &str) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    for model in raw.split(',').map(str::trim).filter(|m| !m.is_empty()) {
        if !models.iter().any(|m| m == model) {
            models.push(model.to_string());
        }
    }
    models
}
