//! Prompt cache - generated tool prompts persisted in a JSON file
//!
//! Every `put` is a full read-modify-write of the file. There is no locking:
//! two processes writing at once race and the last writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::storage;

/// One cache entry. Plain strings are the legacy format and carry no date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum CacheEntry {
    Plain(String),
    Stamped { prompt: String, generated_on: NaiveDate },
}

impl CacheEntry {
    fn prompt(&self) -> &str {
        match self {
            CacheEntry::Plain(prompt) => prompt,
            CacheEntry::Stamped { prompt, .. } => prompt,
        }
    }

    fn generated_on(&self) -> Option<NaiveDate> {
        match self {
            CacheEntry::Plain(_) => None,
            CacheEntry::Stamped { generated_on, .. } => Some(*generated_on),
        }
    }
}

/// Persistent map from exact tool name to generated system prompt
#[derive(Debug, Clone)]
pub struct PromptCache {
    path: PathBuf,
    max_age_days: Option<u32>,
}

impl PromptCache {
    /// Cache whose entries never go stale
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age_days: None,
        }
    }

    /// Treat entries older than `days` as absent
    pub fn with_max_age_days(mut self, days: Option<u32>) -> Self {
        self.max_age_days = days;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every readable entry. Malformed values are skipped, not fatal to the rest.
    fn load_all(&self) -> BTreeMap<String, CacheEntry> {
        let raw: BTreeMap<String, Value> = match storage::read_json(&self.path) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                log::warn!("Prompt cache unreadable, treating as empty: {}", e);
                return BTreeMap::new();
            }
        };

        raw.into_iter()
            .filter_map(|(name, value)| match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) => Some((name, entry)),
                Err(e) => {
                    log::warn!("Skipping malformed prompt cache entry {}: {}", name, e);
                    None
                }
            })
            .collect()
    }

    /// Cached prompt for `tool_name`, unless absent or stale
    pub fn get(&self, tool_name: &str) -> Option<String> {
        self.get_on(tool_name, Local::now().date_naive())
    }

    /// [`get`](Self::get) with an explicit "today"
    pub fn get_on(&self, tool_name: &str, today: NaiveDate) -> Option<String> {
        let entries = self.load_all();
        let entry = entries.get(tool_name)?;

        if let (Some(max_age), Some(generated_on)) = (self.max_age_days, entry.generated_on()) {
            let age = (today - generated_on).num_days();
            if age > i64::from(max_age) {
                log::info!("Cached prompt for {} is {} days old, regenerating", tool_name, age);
                return None;
            }
        }

        Some(entry.prompt().to_string())
    }

    /// Cached prompt for `tool_name` regardless of age
    pub fn get_any(&self, tool_name: &str) -> Option<String> {
        self.load_all().get(tool_name).map(|entry| entry.prompt().to_string())
    }

    /// Store a prompt, writing the whole file immediately
    pub fn put(&self, tool_name: &str, prompt: &str) -> Result<()> {
        self.put_on(tool_name, prompt, Local::now().date_naive())
    }

    /// [`put`](Self::put) with an explicit generation date
    pub fn put_on(&self, tool_name: &str, prompt: &str, today: NaiveDate) -> Result<()> {
        let mut entries = self.load_all();
        entries.insert(
            tool_name.to_string(),
            CacheEntry::Stamped {
                prompt: prompt.to_string(),
                generated_on: today,
            },
        );
        storage::write_json(&self.path, &entries)
    }

    /// Drop the entry for `tool_name`. Returns whether one existed.
    pub fn remove(&self, tool_name: &str) -> Result<bool> {
        let mut entries = self.load_all();
        if entries.remove(tool_name).is_none() {
            return Ok(false);
        }
        storage::write_json(&self.path, &entries)?;
        Ok(true)
    }
}
