//! Projectflow CLI entry point.

use clap::Parser;
use std::path::Path;

use projectflow::cli::{handle_error, Cli, Commands};
use projectflow::infrastructure::config::{ConfigLoader, CONFIG_DIR};
use projectflow::infrastructure::logging::{purge_expired_logs, LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.json).await {
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, json_mode: bool) -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;

    let log_dir = Path::new(CONFIG_DIR).join("logs");
    let log_dir = log_dir.is_dir().then_some(log_dir);
    let _logger = LoggerImpl::init(&LogConfig::from_settings(&config.logging, log_dir.clone()))?;

    if let Some(dir) = &log_dir {
        if let Err(e) = purge_expired_logs(dir, config.logging.retention_days).await {
            tracing::warn!(error = %e, "Failed to purge expired log files");
        }
    }

    match command {
        Commands::Init(args) => projectflow::cli::commands::init::execute(args, json_mode).await,
        Commands::Rule(args) => {
            projectflow::cli::commands::rule::execute(args, &config, json_mode).await
        }
        Commands::Board(args) => {
            projectflow::cli::commands::board::execute(args, &config, json_mode).await
        }
    }
}
