//! Main entry point for the helpdesk CLI.

use clap::{Parser, Subcommand};
use directories::BaseDirs;
use dotenv::dotenv;
use shared::config::client::{Config, LogFormat};
use std::{error::Error, path::PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod terminal;

/// Helpdesk CLI
#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "Chat with the IT support assistant and manage support tickets", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., config.yaml or config.json). Defaults to the user config directory when present."
    )]
    config: Option<PathBuf>,

    /// Helpdesk server base URL, overriding the configuration
    #[arg(
        long,
        global = true,
        help = "Helpdesk server base URL (e.g., http://localhost:5000). Overrides the configuration file and environment."
    )]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the helpdesk CLI
#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session with the support assistant
    Chat,

    /// Inspect or update a support ticket
    Complaint {
        #[command(subcommand)]
        action: commands::complaint::ComplaintCommand,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            value_enum,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

/// Default location of the configuration file in the user's config directory.
fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("helpdesk").join("config.yaml"))
}

/// Picks the explicit config path, falling back to the default location if a file exists there.
fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| default_config_path().filter(|path| path.exists()))
}

/// Initializes the tracing subscriber on stderr so chat output on stdout stays readable.
fn initialize_tracing(config: &Config) {
    let default_level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    });

    let fmt_builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if matches!(config.log_format, LogFormat::Json) {
        fmt_builder.json().with_ansi(false).init();
    } else {
        fmt_builder.with_ansi(true).init();
    }
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let config_path = resolve_config_path(cli.config.clone());
    let config = Config::load_config(config_path.clone(), cli.server.as_deref())?;
    initialize_tracing(&config);
    match &config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), base_url = %config.base_url, "loaded configuration file");
        }
        None => tracing::debug!(base_url = %config.base_url, "using default configuration"),
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Chat => {
            let config = load_config(&cli)?;
            commands::chat::start_chat(&config).await?;
        }
        Commands::Complaint { action } => {
            let config = load_config(&cli)?;
            commands::complaint::handle_complaint(action, &config).await?;
        }
        Commands::Completion { shell } => {
            commands::completion::generate_completion(*shell);
        }
        Commands::Config { format } => {
            let format = format.as_deref().unwrap_or("yaml");
            commands::config::generate_config(format)?;
        }
    }

    Ok(())
}
