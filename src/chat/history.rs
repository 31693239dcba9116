use crate::llm::Message;

/// Conversation history to forward with a new question.
///
/// Keeps the last `2 * max_history_messages` entries, then drops anything
/// that is not a user or assistant turn. Fewer than two messages (a lone
/// greeting) forwards nothing.
pub fn prepare_history(messages: &[Message], max_history_messages: usize) -> Vec<Message> {
    if messages.len() < 2 {
        return Vec::new();
    }

    let window = max_history_messages.saturating_mul(2);
    let start = messages.len().saturating_sub(window);

    messages[start..]
        .iter()
        .filter(|m| m.role.is_conversational())
        .cloned()
        .collect()
}
