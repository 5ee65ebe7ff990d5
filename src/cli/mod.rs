//! CLI module for airtable-mcp - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
