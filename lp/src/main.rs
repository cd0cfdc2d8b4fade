//! learnpath - learning path generator
//!
//! CLI entry point for generating, rendering and normalizing learning paths.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use learnpath::cli::{Cli, Command};
use learnpath::config::Config;
use learnpath::llm::create_client;
use learnpath::pipeline;
use learnpath::prompts::PromptLoader;
use learnpath::service::{self, GenerationResponse, LearningPathService};
use pathstore::PathStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("learnpath")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("learnpath.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            goal,
            save,
            user,
            flowchart_out,
        } => {
            debug!(save, ?user, ?flowchart_out, "main: matched Generate command");
            let goal = Command::goal_text(&goal);
            cmd_generate(&config, &goal, save, user.as_deref(), flowchart_out.as_deref()).await
        }
        Command::Render { file } => {
            debug!(?file, "main: matched Render command");
            cmd_render(&file)
        }
        Command::Normalize { file } => {
            debug!(?file, "main: matched Normalize command");
            cmd_normalize(&file)
        }
    }
}

async fn cmd_generate(
    config: &Config,
    goal: &str,
    save: bool,
    user: Option<&str>,
    flowchart_out: Option<&Path>,
) -> Result<()> {
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptLoader::new(config.generation.prompts_dir.as_deref());
    let service = LearningPathService::new(llm, prompts, &config.generation);

    let response = service.generate_learning_path(goal).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    let GenerationResponse::Success {
        learning_path,
        roadmap_flowchart,
    } = &response
    else {
        eprintln!("{}", "Generation failed".red());
        eyre::bail!("Generation failed");
    };

    if let Some(path) = flowchart_out {
        fs::write(path, roadmap_flowchart).context(format!("Failed to write flowchart to {}", path.display()))?;
        eprintln!("{} {}", "Flowchart written to".green(), path.display());
    }

    if save {
        // Storage failures never fail a generation that already succeeded
        let user = user.unwrap_or(config.storage.default_user.as_str());
        let saved = PathStore::open(&config.storage.store_dir)
            .and_then(|store| service::save_to_store(&store, learning_path, roadmap_flowchart, Some(user)));
        match saved {
            Ok(details) => {
                info!(path_id = %details.path_id, "cmd_generate: saved");
                eprintln!(
                    "{} {} ({})",
                    "Saved as".green(),
                    details.path_id.bold(),
                    details.storage_location.dimmed()
                );
            }
            Err(e) => {
                warn!(error = %e, "cmd_generate: failed to save learning path");
                eprintln!("{} {:#}", "Warning: could not save learning path:".yellow(), e);
            }
        }
    }

    Ok(())
}

/// Read a learning path from a file
///
/// Accepts a bare learning path, a generate payload or a stored record; the
/// latter two carry the path under `learning_path`.
fn read_learning_path(file: &Path) -> Result<learnpath::LearningPath> {
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context(format!("Failed to parse {} as JSON", file.display()))?;

    let inner = value.get("learning_path").filter(|v| v.is_object()).unwrap_or(&value);
    Ok(pipeline::normalize(inner)?)
}

fn cmd_render(file: &Path) -> Result<()> {
    let path = read_learning_path(file)?;
    print!("{}", pipeline::render(&path));
    Ok(())
}

fn cmd_normalize(file: &Path) -> Result<()> {
    let path = read_learning_path(file)?;
    println!("{}", serde_json::to_string_pretty(&path)?);
    Ok(())
}
