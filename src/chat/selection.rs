//! What a question is about: general AI, one tool, or several tools.

use crate::locale::Language;
use crate::prompt::templates::{ANSWER_TEMPERATURE, COMPARISON_TEMPERATURE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolSelection {
    #[default]
    GeneralOnly,
    SingleTool(String),
    MultiTool {
        /// Ordered, no duplicates
        names: Vec<String>,
        include_general: bool,
    },
}

impl ToolSelection {
    /// Multi-tool selection; drops blank and repeated names, keeping first occurrence order
    pub fn multi<I, S>(names: I, include_general: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ToolSelection::MultiTool {
            names: dedup_names(names),
            include_general,
        }
    }

    /// Map a multiselect (general-chat entry plus tool names) to a selection.
    ///
    /// General alone is `GeneralOnly`; general with any tools is a multi-tool
    /// selection that also welcomes general questions; one tool is
    /// `SingleTool`; several tools are `MultiTool`. An empty choice falls back
    /// to `GeneralOnly`.
    pub fn from_choices<S: AsRef<str>>(general: bool, tools: &[S]) -> Self {
        let mut names = dedup_names(tools);

        match (general, names.len()) {
            (_, 0) => ToolSelection::GeneralOnly,
            (true, _) => ToolSelection::MultiTool {
                names,
                include_general: true,
            },
            (false, 1) => ToolSelection::SingleTool(names.remove(0)),
            (false, _) => ToolSelection::MultiTool {
                names,
                include_general: false,
            },
        }
    }

    /// Tool names this selection is about, in order
    pub fn tool_names(&self) -> Vec<&str> {
        match self {
            ToolSelection::GeneralOnly => Vec::new(),
            ToolSelection::SingleTool(name) => vec![name.as_str()],
            ToolSelection::MultiTool { names, .. } => names.iter().map(String::as_str).collect(),
        }
    }

    /// Sampling temperature for answers under this selection
    pub fn temperature(&self) -> f32 {
        match self {
            ToolSelection::MultiTool { .. } => COMPARISON_TEMPERATURE,
            _ => ANSWER_TEMPERATURE,
        }
    }

    /// Short human-readable label
    pub fn describe(&self, language: Language) -> String {
        let tools = self.tool_names().join(", ");
        match self {
            ToolSelection::GeneralOnly => language.general_chat_label().to_string(),
            ToolSelection::MultiTool {
                include_general: true,
                ..
            } => format!("{} + {}", language.general_chat_label(), tools),
            _ => tools,
        }
    }

    /// Assistant greeting that opens a session with this selection
    pub fn greeting(&self, language: Language) -> String {
        let tools = self.tool_names().join(", ");
        match self {
            ToolSelection::GeneralOnly => language.greeting_general(),
            ToolSelection::MultiTool {
                include_general: true,
                ..
            } => language.greeting_mixed(&tools),
            _ => language.greeting_tools(&tools),
        }
    }
}

fn dedup_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_from_choices_general_only() {
        assert_eq!(ToolSelection::from_choices(true, &NONE), ToolSelection::GeneralOnly);
    }

    #[test]
    fn test_from_choices_nothing_selected() {
        assert_eq!(ToolSelection::from_choices(false, &NONE), ToolSelection::GeneralOnly);
        assert_eq!(ToolSelection::from_choices(false, &["  "]), ToolSelection::GeneralOnly);
    }

    #[test]
    fn test_from_choices_general_with_tools() {
        assert_eq!(
            ToolSelection::from_choices(true, &["Cursor"]),
            ToolSelection::MultiTool {
                names: vec!["Cursor".to_string()],
                include_general: true,
            }
        );
    }

    #[test]
    fn test_from_choices_single_tool() {
        assert_eq!(
            ToolSelection::from_choices(false, &["Cursor"]),
            ToolSelection::SingleTool("Cursor".to_string())
        );
        assert_eq!(
            ToolSelection::from_choices(false, &["Cursor", "Cursor"]),
            ToolSelection::SingleTool("Cursor".to_string())
        );
    }

    #[test]
    fn test_from_choices_several_tools() {
        assert_eq!(
            ToolSelection::from_choices(false, &["B", "A", "B"]),
            ToolSelection::MultiTool {
                names: vec!["B".to_string(), "A".to_string()],
                include_general: false,
            }
        );
    }

    #[test]
    fn test_temperature_by_mode() {
        assert_eq!(ToolSelection::GeneralOnly.temperature(), 0.7);
        assert_eq!(ToolSelection::SingleTool("A".into()).temperature(), 0.7);
        assert_eq!(ToolSelection::multi(["A", "B"], false).temperature(), 0.1);
    }

    #[test]
    fn test_tool_names() {
        let selection = ToolSelection::multi(["A", "B"], true);
        assert_eq!(selection.tool_names(), vec!["A", "B"]);
        assert_eq!(ToolSelection::SingleTool("A".into()).tool_names(), vec!["A"]);
        assert!(ToolSelection::GeneralOnly.tool_names().is_empty());
    }

    #[test]
    fn test_describe_and_greeting() {
        let selection = ToolSelection::multi(["ChatGPT", "Cursor"], true);
        assert_eq!(selection.describe(Language::English), "General chat + ChatGPT, Cursor");
        assert!(selection.greeting(Language::English).contains("ChatGPT, Cursor"));

        let single = ToolSelection::SingleTool("Cursor".into());
        assert_eq!(single.describe(Language::English), "Cursor");
        assert!(single.greeting(Language::English).starts_with("Welcome to the chat about: Cursor"));

        assert_eq!(
            ToolSelection::GeneralOnly.greeting(Language::Hebrew),
            Language::Hebrew.greeting_general()
        );
    }
}
