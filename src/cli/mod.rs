//! CLI module for toolchat - command-line interface and the interactive loop.

pub mod commands;
pub mod repl;

pub use commands::Cli;
