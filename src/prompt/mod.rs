//! Prompts - cached per-tool prompts and the instruction texts around them
//!
//! - `cache`: the persistent tool-name → prompt map
//! - `synthesizer`: cache-or-generate for one tool
//! - `templates`: every instruction and question string sent to the model

mod cache;
mod synthesizer;
pub mod templates;

pub use cache::PromptCache;
pub use synthesizer::PromptSynthesizer;
