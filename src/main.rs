use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use studybot::config::{self, StudyBotConfig};
use studybot::{cli, server};

#[derive(Parser)]
#[command(name = "studybot", version, about = "AI-powered study assistant backend")]
struct Cli {
    /// Path to a TOML config file (defaults to ~/.studybot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API (default)
    Serve,
    /// Show how many conversations are stored
    Stats,
    /// Print the most recent conversations
    History {
        /// Number of conversations to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Delete all stored conversations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = StudyBotConfig::load_from(&config_path)?;

    // Log to stderr so command output on stdout stays clean.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &config.source {
        Some(path) => tracing::info!("loaded config from {}", path.display()),
        None => tracing::info!("no config file at {}, using defaults", config_path.display()),
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::serve(config).await?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::History { limit } => cli::history::history(&config, limit)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
