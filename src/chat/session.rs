//! Chat session - the running conversation of one interactive user

use super::orchestrator::Orchestrator;
use super::selection::ToolSelection;
use crate::llm::{Message, Role};
use crate::locale::Language;

/// Conversation state: the current selection and every message so far
#[derive(Debug, Clone)]
pub struct ChatSession {
    selection: ToolSelection,
    language: Language,
    messages: Vec<Message>,
}

impl ChatSession {
    /// New session opened with the selection's greeting
    pub fn new(selection: ToolSelection, language: Language) -> Self {
        let mut session = Self {
            selection,
            language,
            messages: Vec::new(),
        };
        session.reset();
        session
    }

    pub fn selection(&self) -> &ToolSelection {
        &self.selection
    }

    /// Switch to another selection and start over
    pub fn set_selection(&mut self, selection: ToolSelection) {
        self.selection = selection;
        self.reset();
    }

    /// Drop the conversation, keeping only a fresh greeting
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages
            .push(Message::assistant(self.selection.greeting(self.language)));
    }

    pub fn add_user_message(&mut self, content: &str) {
        self.messages.push(Message::user(content));
    }

    pub fn add_assistant_message(&mut self, content: &str) {
        self.messages.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Every message except a trailing user question
    pub fn history_before_latest(&self) -> &[Message] {
        match self.messages.last() {
            Some(last) if last.role == Role::User => &self.messages[..self.messages.len() - 1],
            _ => &self.messages,
        }
    }

    /// Record `question`, ask it, record and return the answer
    pub async fn submit(&mut self, orchestrator: &Orchestrator, question: &str) -> String {
        self.add_user_message(question);
        let answer = orchestrator
            .ask(&self.selection, question, self.history_before_latest())
            .await;
        self.add_assistant_message(&answer);
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::llm::MockLlmClient;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_new_session_has_greeting() {
        let session = ChatSession::new(ToolSelection::GeneralOnly, Language::English);
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert_eq!(session.messages()[0].content, Language::English.greeting_general());
    }

    #[test]
    fn test_greeting_depends_on_selection() {
        let session = ChatSession::new(ToolSelection::multi(["A", "B"], true), Language::English);
        assert_eq!(session.messages()[0].content, Language::English.greeting_mixed("A, B"));

        let session = ChatSession::new(ToolSelection::SingleTool("A".into()), Language::Hebrew);
        assert_eq!(session.messages()[0].content, Language::Hebrew.greeting_tools("A"));
    }

    #[test]
    fn test_history_before_latest() {
        let mut session = ChatSession::new(ToolSelection::GeneralOnly, Language::English);
        session.add_user_message("first");
        assert_eq!(session.history_before_latest().len(), 1);

        session.add_assistant_message("answer");
        assert_eq!(session.history_before_latest().len(), 3);
    }

    #[test]
    fn test_set_selection_resets() {
        let mut session = ChatSession::new(ToolSelection::GeneralOnly, Language::English);
        session.add_user_message("q");
        session.add_assistant_message("a");

        session.set_selection(ToolSelection::SingleTool("Cursor".into()));

        assert_eq!(session.message_count(), 1);
        assert_eq!(session.selection(), &ToolSelection::SingleTool("Cursor".into()));
    }

    #[tokio::test]
    async fn test_submit_records_exchange() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = dir.path().to_path_buf();
        let mock = Arc::new(MockLlmClient::new().with_default_reply("answer"));
        let orch = Orchestrator::from_config(&config, mock.clone(), Catalog::default());
        let mut session = ChatSession::new(ToolSelection::GeneralOnly, Language::English);

        let first = session.submit(&orch, "one").await;
        session.submit(&orch, "two").await;

        assert_eq!(first, "answer");
        assert_eq!(session.message_count(), 5);
        // greeting + first exchange forwarded with the second question
        let request = mock.last_request().unwrap();
        assert_eq!(request.messages.len(), 5);
        assert_eq!(request.messages[1].content, Language::English.greeting_general());
    }
}
