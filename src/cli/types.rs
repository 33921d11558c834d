//! CLI type definitions
//!
//! Clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use crate::cli::commands::board::BoardArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::rule::RuleArgs;

#[derive(Parser, Debug)]
#[command(name = "projectflow")]
#[command(about = "Projectflow - project board automation rules", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize projectflow configuration and database
    Init(InitArgs),

    /// Author and inspect automation rules
    Rule(RuleArgs),

    /// Manage project columns, labels and issue placement
    Board(BoardArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_json_flag() {
        let cli = Cli::try_parse_from(["projectflow", "rule", "list", "--project", "3", "--json"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Rule(_)));
    }
}
