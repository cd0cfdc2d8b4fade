use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use pathstore::PathStore;
use pathstore::cli::{Cli, Command};
use pathstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("pathstore starting at {}", store_path.display());
    let store = PathStore::open(&store_path)?;

    match cli.command {
        Command::List { user } => {
            let paths = store.list(user.as_deref())?;
            if paths.is_empty() {
                println!("No learning paths found");
            } else {
                for p in paths {
                    println!(
                        "{} {} {} {}",
                        p.path_id.cyan(),
                        p.user_id.yellow(),
                        p.created_at.dimmed(),
                        p.title
                    );
                }
            }
        }
        Command::Show { path_id } => {
            let stored = store.get(&path_id)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Command::Flowchart { path_id } => {
            let code = store.flowchart(&path_id)?;
            println!("{}", code);
        }
        Command::Delete { path_id } => {
            store.delete(&path_id)?;
            println!("{} Deleted learning path: {}", "✓".green(), path_id);
        }
    }

    Ok(())
}
