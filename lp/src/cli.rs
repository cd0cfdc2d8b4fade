//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// learnpath - LLM-backed learning path generator
#[derive(Parser)]
#[command(
    name = "lp",
    about = "Generate structured learning paths from a free-text goal",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a learning path and print the response payload as JSON
    Generate {
        /// Learning goal, e.g. "learn Python basics"
        #[arg(required = true, num_args = 1.., value_name = "GOAL")]
        goal: Vec<String>,

        /// Persist the generated path in the path store
        #[arg(short, long)]
        save: bool,

        /// User id recorded with the saved path
        #[arg(short, long, requires = "save")]
        user: Option<String>,

        /// Also write the Mermaid flowchart to this file
        #[arg(short, long, value_name = "FILE")]
        flowchart_out: Option<PathBuf>,
    },

    /// Normalize a saved learning path and print its flowchart
    Render {
        /// JSON file holding a learning path
        file: PathBuf,
    },

    /// Print the normalized form of a saved learning path
    Normalize {
        /// JSON file holding a learning path
        file: PathBuf,
    },
}

impl Command {
    /// Join the goal words back into one prompt
    pub fn goal_text(goal: &[String]) -> String {
        goal.join(" ")
    }
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
    fn test_generate_collects_goal_words() {
        let cli = Cli::parse_from(["lp", "generate", "learn", "Python", "basics", "--save", "--user", "42"]);
        match cli.command {
            Command::Generate { goal, save, user, .. } => {
                assert_eq!(Command::goal_text(&goal), "learn Python basics");
                assert!(save);
                assert_eq!(user.as_deref(), Some("42"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_user_requires_save() {
        assert!(Cli::try_parse_from(["lp", "generate", "rust", "--user", "42"]).is_err());
    }
}
