//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod expand;
pub mod prepare;
pub mod query;
pub mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tp_core::config::Config;
use tp_core::placeholder::Argument;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".threadprep/config.toml";

/// threadprep - SQL placeholder preparation and comment thread rendering
#[derive(Debug, Parser)]
#[command(name = "threadprep")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "THREADPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Prepare a SQL query with escaped arguments
    Prepare(prepare::PrepareArgs),

    /// Expand implode placeholders without substituting values
    Expand(expand::ExpandArgs),

    /// Show the comment query for a post
    Query(query::QueryArgs),

    /// Render the comment list of a post
    Render(render::RenderArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    match cli.command {
        Commands::Prepare(args) => prepare::execute(args, &load_config(&config_path)?),
        Commands::Expand(args) => expand::execute(args),
        Commands::Query(args) => query::execute(args, &load_config(&config_path)?),
        Commands::Render(args) => render::execute(args, &load_config(&config_path)?),
        Commands::Config(cmd) => config::execute(cmd, &config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration file, falling back to defaults when it is missing
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("No configuration at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Invalid configuration {}", path.display()))
}

/// Parse a command-line argument value.
///
/// JSON scalars and arrays are taken as such; anything that is not valid
/// JSON is passed as a plain string.
pub fn parse_argument(raw: &str) -> Result<Argument> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::from_value(value)
            .with_context(|| format!("Unsupported argument value: {}", raw)),
        Err(_) => Ok(Argument::from(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tp_core::placeholder::Scalar;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_parse_argument() {
        assert_eq!(parse_argument("5").unwrap(), Argument::from(5));
        assert_eq!(parse_argument("\"5\"").unwrap(), Argument::from("5"));
        assert_eq!(parse_argument("foo").unwrap(), Argument::from("foo"));
        assert_eq!(parse_argument("null").unwrap(), Argument::Scalar(Scalar::Null));
        assert_eq!(
            parse_argument("[1, 2]").unwrap(),
            Argument::from(vec![1, 2])
        );
        assert!(parse_argument("[[1]]").is_err());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/threadprep.toml")).unwrap();
        assert_eq!(config.discussion.comments_per_page, 50);
    }
}
