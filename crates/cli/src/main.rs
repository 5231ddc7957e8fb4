//! hookrelay CLI: the main entry point.
//!
//! Commands:
//! - `serve`     Start the relay HTTP server
//! - `config`    Show, locate, or validate configuration
//! - `doctor`    Diagnose configuration problems

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "hookrelay",
    about = "hookrelay: relay message-queue hook callbacks into Slack",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "HOOKRELAY_JSON_LOGS")]
    json_logs: bool,

    /// Config file to use instead of ~/.hookrelay/config.toml
    #[arg(short, long, global = true, env = "HOOKRELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Override the listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the URL the queue platform calls back on
        #[arg(long)]
        callback_url: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration problems
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve {
            host,
            port,
            callback_url,
        } => {
            let overrides = commands::serve::Overrides {
                host,
                port,
                callback_url,
            };
            commands::serve::run(config_path, overrides).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path)?,
            ConfigAction::Path => commands::config_cmd::path(config_path),
            ConfigAction::Validate => commands::config_cmd::validate(config_path)?,
        },
        Commands::Doctor => commands::doctor::run(config_path),
    }

    Ok(())
}
