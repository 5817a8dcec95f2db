//! Config command
//!
//! Manage threadprep configuration.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;
use tp_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(path, json),
        ConfigCommand::Reset { force } => reset_config(path, force),
        ConfigCommand::Validate => validate_config(path),
    }
}

fn show_config(path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = super::load_config(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no configuration file)".dimmed());
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

/// Default configuration file content
pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default configuration")?;
    Ok(format!("# threadprep configuration\n\n{}", body))
}

fn reset_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    if path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_config_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    use colored::Colorize;

    if !path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(path)?;
    let config: Config = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "✗".red(), e);
            bail!("Configuration {} is invalid", path.display());
        }
    };
    println!("{} Configuration is valid", "✓".green());

    for warning in check_config(&config) {
        println!("{} {}", "⚠".yellow(), warning);
    }

    Ok(())
}

/// Settings that parse but will not behave as intended
fn check_config(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.discussion.page_comments && config.discussion.comments_per_page == 0 {
        warnings.push(
            "discussion.page_comments is on but comments_per_page is 0, paging is disabled"
                .to_string(),
        );
    }
    if config.render.list_class.trim().is_empty() {
        warnings.push("render.list_class is empty".to_string());
    }
    if config
        .database
        .placeholder_seed
        .as_deref()
        .is_some_and(|seed| seed.is_empty())
    {
        warnings.push("database.placeholder_seed is empty".to_string());
    }

    warnings
}
