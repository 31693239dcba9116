//! CLI command definitions using clap.
//!
//! - chat: interactive conversation (default)
//! - ask: one-shot question
//! - tools: list the catalog
//! - prompt / forget: inspect or drop a cached tool prompt

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use toolchat::chat::ToolSelection;

/// Toolchat - ask an assistant about AI tools
#[derive(Parser, Debug)]
#[command(name = "toolchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat on stdin
    Chat {
        #[command(flatten)]
        target: Target,
    },

    /// Ask a single question and print the answer
    Ask {
        #[command(flatten)]
        target: Target,

        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// List catalog tool names
    Tools {
        /// Fetch the remote catalog even if it was refreshed today
        #[arg(short, long)]
        refresh: bool,
    },

    /// Print the cached prompt for a tool, generating it if needed
    Prompt {
        /// Exact tool name
        name: String,
    },

    /// Remove a tool's cached prompt
    Forget {
        /// Exact tool name
        name: String,
    },
}

/// What the questions are about
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct Target {
    /// Tool to ask about (repeatable)
    #[arg(short, long = "tool", value_name = "NAME")]
    pub tools: Vec<String>,

    /// Also allow general AI questions alongside the tools
    #[arg(short, long)]
    pub general: bool,
}

impl Target {
    pub fn selection(&self) -> ToolSelection {
        ToolSelection::from_choices(self.general || self.tools.is_empty(), &self.tools)
    }
}
