//! Interactive chat loop on stdin

use std::io::Write;

use colored::*;
use eyre::{Context, Result};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use toolchat::chat::{ChatSession, Orchestrator, ToolSelection};

const HELP: &str = "Commands:
  /tools           list catalog tools
  /select a, b     ask about these tools (add 'general' to allow general questions)
  /general         general AI questions only
  /reset           start the conversation over
  /help            show this help
  /quit            exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Empty,
    Ask(String),
    Tools,
    Select(ToolSelection),
    Reset,
    Help,
    Quit,
    Unknown(String),
}

/// Interpret a line typed at the prompt
pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };

    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    match name {
        "tools" => ReplCommand::Tools,
        "general" => ReplCommand::Select(ToolSelection::GeneralOnly),
        "select" => {
            let mut general = false;
            let mut tools = Vec::new();
            for choice in rest.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                if choice.eq_ignore_ascii_case("general") {
                    general = true;
                } else {
                    tools.push(choice);
                }
            }
            ReplCommand::Select(ToolSelection::from_choices(general, &tools))
        }
        "reset" => ReplCommand::Reset,
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

/// Run the chat until `/quit` or end of input.
///
/// The catalog is re-synced before questions and listings, so a session left
/// open past midnight picks up that day's refresh.
pub async fn run(orchestrator: &mut Orchestrator, selection: ToolSelection) -> Result<()> {
    let language = orchestrator.settings().language;
    let mut session = ChatSession::new(selection, language);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_greeting(&session);
    println!("{}", "Type /help for commands.".dimmed());

    loop {
        print!("{} ", ">".green().bold());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Ask(question) => {
                orchestrator.sync_catalog().await;
                let answer = session.submit(orchestrator, &question).await;
                println!("\n{}\n", answer);
            }
            ReplCommand::Tools => {
                orchestrator.sync_catalog().await;
                let catalog = orchestrator.catalog();
                if catalog.is_empty() {
                    println!("{}", "No tools in the catalog.".yellow());
                }
                for name in catalog.names() {
                    println!("  {}", name);
                }
            }
            ReplCommand::Select(selection) => {
                for name in selection.tool_names() {
                    if !orchestrator.catalog().contains(name) {
                        println!("{} {} is not in the catalog", "Note:".yellow(), name);
                    }
                }
                info!("Selection changed to {}", selection.describe(language));
                session.set_selection(selection);
                print_greeting(&session);
            }
            ReplCommand::Reset => {
                session.reset();
                print_greeting(&session);
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(name) => {
                println!("{} unknown command /{} (try /help)", "Error:".red(), name);
            }
        }
    }

    info!(
        "Chat ended after {} messages, {} tokens used",
        session.message_count(),
        orchestrator.usage().total()
    );
    Ok(())
}

fn print_greeting(session: &ChatSession) {
    if let Some(greeting) = session.messages().first() {
        println!("\n{}\n", greeting.content.cyan());
    }
}
