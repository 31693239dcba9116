//! Tool records and catalog document parsing

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Rendered in prompts for fields a catalog entry does not carry
pub const UNKNOWN: &str = "Unknown";

/// A catalog rating, published either as a number or as free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Number(f64),
    Text(String),
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Number(n) => write!(f, "{}", n),
            Rating::Text(s) => write!(f, "{}", s),
        }
    }
}

/// An AI tool known to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Tool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            rating: None,
            url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn description_or_unknown(&self) -> &str {
        self.description.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn category_or_unknown(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn rating_or_unknown(&self) -> String {
        self.rating
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn url_or_unknown(&self) -> &str {
        self.url.as_deref().unwrap_or(UNKNOWN)
    }
}

/// The two document shapes the catalog endpoint publishes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Value>),
    Wrapped { tools: Vec<Value> },
}

/// Parse a catalog document: either a bare array of tools or `{"tools": [...]}`.
///
/// Entries without a non-empty string `name`, or that otherwise fail to parse,
/// are skipped.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Tool>> {
    let entries = match serde_json::from_slice::<CatalogDocument>(bytes)? {
        CatalogDocument::List(entries) => entries,
        CatalogDocument::Wrapped { tools } => tools,
    };

    let tools = entries
        .into_iter()
        .filter(|entry| entry.get("name").and_then(Value::as_str).is_some_and(|n| !n.is_empty()))
        .filter_map(|entry| match serde_json::from_value::<Tool>(entry) {
            Ok(tool) => Some(tool),
            Err(e) => {
                log::warn!("Skipping malformed catalog entry: {}", e);
                None
            }
        })
        .collect();

    Ok(tools)
}
