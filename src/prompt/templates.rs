//! Instruction and question texts sent to the model.

use crate::catalog::Tool;
use crate::locale::Language;

/// Sampling temperature for prompt generation and single-subject answers
pub const ANSWER_TEMPERATURE: f32 = 0.7;

/// Lower temperature for multi-tool comparisons
pub const COMPARISON_TEMPERATURE: f32 = 0.1;

/// Fixed user turn of a prompt-generation exchange
pub const GENERATION_USER_TURN: &str = "You are an expert in AI tools and advanced technologies.";

const GENERATION_SECTIONS: &str = "1. A detailed description of what the tool does
2. Main capabilities of the tool
3. Common use cases
4. Known limitations and disadvantages
5. Similar alternatives";

/// Instruction asking the model to write a system prompt for `tool_name`
pub fn generation_instruction(tool_name: &str, tool: Option<&Tool>, language: Language) -> String {
    let body = match tool {
        Some(tool) => format!(
            "Here is some basic information about the tool:
Description: {}
Category: {}
Rating: {}

Based on this information, expand the prompt to include:
{}",
            tool.description_or_unknown(),
            tool.category_or_unknown(),
            tool.rating_or_unknown(),
            GENERATION_SECTIONS
        ),
        None => format!("The prompt should include:\n{}", GENERATION_SECTIONS),
    };

    format!(
        "Create a system prompt for an AI tool named {}.

{}

The prompt should be comprehensive and present the tool in a balanced way.

Always answer in {} and keep responses concise.",
        tool_name,
        body,
        language.name()
    )
}

/// Metadata block for one catalog tool
pub fn tool_metadata_block(tool: &Tool) -> String {
    format!(
        "Tool: {}
Description: {}
Category: {}
Rating: {}
URL: {}",
        tool.name,
        tool.description_or_unknown(),
        tool.category_or_unknown(),
        tool.rating_or_unknown(),
        tool.url_or_unknown()
    )
}

/// Fixed generalist system prompt
pub fn general_system_prompt(language: Language) -> String {
    format!(
        "You are a helpful and accurate information assistant. You are an expert in AI tools, \
machine learning models, and software development. You answer in {} and strive to provide \
accurate and useful information.",
        language.name()
    )
}

/// System prompt for questions about one tool
pub fn single_tool_system_prompt(
    tool_name: &str,
    tool: Option<&Tool>,
    tool_prompt: &str,
    language: Language,
) -> String {
    let details = match tool {
        Some(tool) => format!(
            "Basic information:
Description: {}
Category: {}
Rating: {}
URL: {}

Additional information:
{}",
            tool.description_or_unknown(),
            tool.category_or_unknown(),
            tool.rating_or_unknown(),
            tool.url_or_unknown(),
            tool_prompt
        ),
        None => tool_prompt.to_string(),
    };

    format!(
        "You are an expert in the tool {}. Here is information about the tool:

{}

Answer in {} in a concise and accurate manner. If you don't have information, simply say so.",
        tool_name,
        details,
        language.name()
    )
}

/// System prompt for questions spanning several tools.
///
/// `found` are the catalog entries for the requested tools; `missing` are
/// requested names the catalog does not know.
pub fn multi_tool_system_prompt(
    names: &[String],
    found: &[&Tool],
    missing: &[&str],
    include_general: bool,
    language: Language,
) -> String {
    let mut prompt = format!("You are an expert in AI tools, especially: {}.\n", names.join(", "));

    if !found.is_empty() {
        prompt.push_str("\nBasic information about the tools:\n");
        for tool in found {
            prompt.push('\n');
            prompt.push_str(&tool_metadata_block(tool));
            prompt.push('\n');
        }
    }

    if !missing.is_empty() {
        prompt.push_str(&format!(
            "\nNo catalog information is available for: {}. Answer about them from general knowledge \
and say so when you are unsure.\n",
            missing.join(", ")
        ));
    }

    if include_general {
        prompt.push_str(
            "\nGeneral questions about AI are welcome as well, not only questions about these tools.\n",
        );
    }

    prompt.push_str(&format!(
        "\nAnswer in {} in a concise and accurate manner. Compare the tools when relevant.",
        language.name()
    ));
    prompt
}

pub fn general_question(question: &str) -> String {
    format!("Question about AI tools: {}", question)
}

pub fn single_tool_question(tool_name: &str, question: &str) -> String {
    format!("Question about {}: {}", tool_name, question)
}

pub fn multi_tool_question(names: &[String], question: &str) -> String {
    format!(
        "Question about the following tools: {}. Question: {}",
        names.join(", "),
        question
    )
}
