//! Chat - answering questions about AI tools
//!
//! - `selection`: which tools a question is about
//! - `history`: how much of the conversation is forwarded
//! - `orchestrator`: builds the model request and falls back to an apology
//! - `session`: the conversation of one interactive user

mod history;
mod orchestrator;
mod selection;
mod session;

pub use history::prepare_history;
pub use orchestrator::{ChatSettings, Orchestrator};
pub use selection::ToolSelection;
pub use session::ChatSession;
