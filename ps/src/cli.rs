//! CLI argument parsing for pathstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Browse stored learning paths", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the store directory
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored learning paths (newest first)
    List {
        /// Only show paths owned by this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Print a stored learning path as JSON
    Show {
        /// Path ID
        #[arg(required = true)]
        path_id: String,
    },

    /// Print the stored Mermaid flowchart
    Flowchart {
        /// Path ID
        #[arg(required = true)]
        path_id: String,
    },

    /// Delete a stored learning path
    Delete {
        /// Path ID
        #[arg(required = true)]
        path_id: String,
    },
}
