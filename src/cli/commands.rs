//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the MCP server on stdio (default)
//! - tools: print the tool catalog
//! - check: run the connection diagnostic once

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Airtable tools over MCP, authenticated through a Nango connection
#[derive(Parser, Debug)]
#[command(name = "airtable-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,

    /// List every tool with its required parameters
    Tools {
        /// Print full JSON definitions instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Verify the broker connection and upstream access
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["airtable-mcp"]);
        assert!(cli.command.is_none());
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_tools_json() {
        let cli = Cli::parse_from(["airtable-mcp", "tools", "--json"]);
        assert_eq!(cli.command, Some(Commands::Tools { json: true }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["airtable-mcp", "check", "-v", "--config", "/tmp/a.yml"]);
        assert_eq!(cli.command, Some(Commands::Check));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.yml")));
    }
}
