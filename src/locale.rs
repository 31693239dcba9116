//! Answer language and the fixed user-facing strings that go with it.

use serde::{Deserialize, Serialize};

/// Language every answer is constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hebrew,
}

impl Language {
    /// Name used inside model instructions
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hebrew => "Hebrew",
        }
    }

    /// Returned when every candidate model failed
    pub fn apology(&self) -> &'static str {
        match self {
            Language::English => "Sorry, I couldn't get an answer right now. Please try again later.",
            Language::Hebrew => "מצטער, לא הצלחתי לקבל תשובה כרגע. אנא נסה שוב מאוחר יותר.",
        }
    }

    /// Placeholder tool prompt used when generation failed
    pub fn basic_info(&self, tool_name: &str) -> String {
        match self {
            Language::English => format!("Basic information about {}", tool_name),
            Language::Hebrew => format!("מידע בסיסי על {}", tool_name),
        }
    }

    /// Label of the general-chat entry in a tool selection
    pub fn general_chat_label(&self) -> &'static str {
        match self {
            Language::English => "General chat",
            Language::Hebrew => "שיחה כללית",
        }
    }

    /// Opening message for a general-only session
    pub fn greeting_general(&self) -> String {
        let text = match self {
            Language::English => concat!(
                "Hi! I can answer questions about AI tools, how to use them, and how they compare. ",
                "How can I help you today? 👋",
            ),
            Language::Hebrew => concat!(
                "הי! אשמח לענות על שאלות בנושא כלי בינה מלאכותית, שימושים שלהם, והשוואות ביניהם. ",
                "אז במה אוכל לעזור לך היום? 👋",
            ),
        };
        text.to_string()
    }

    /// Opening message for a general chat that also covers specific tools
    pub fn greeting_mixed(&self, tools: &str) -> String {
        match self {
            Language::English => format!(
                "Welcome! Happy to talk about AI in general and about these tools: {}. \
                 Ask about capabilities, differences, use cases or anything else 👋",
                tools
            ),
            Language::Hebrew => format!(
                "ברוך הבא! אשמח לשוחח על נושאים כלליים בתחום ה-AI וגם על הכלים הספציפיים: {}. \
                 אתה יכול לשאול על יכולות, הבדלים בין כלים, מקרי שימוש או כל נושא אחר 👋",
                tools
            ),
        }
    }

    /// Opening message for a session about specific tools
    pub fn greeting_tools(&self, tools: &str) -> String {
        match self {
            Language::English => format!(
                "Welcome to the chat about: {}! \
                 Ask me about their capabilities, limitations, pros and cons 👋",
                tools
            ),
            Language::Hebrew => format!(
                "ברוך הבא לשיחה על הכלים: {}! \
                 אשמח לענות על שאלות לגבי יכולות, מגבלות, יתרונות וחסרונות של כלים אלו 👋",
                tools
            ),
        }
    }
}
