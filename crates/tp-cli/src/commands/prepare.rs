//! Prepare command
//!
//! Prepare a SQL query from a printf-style format and arguments.

use anyhow::{Context, Result};
use clap::Args;
use tp_core::config::Config;
use tp_core::placeholder::{Argument, MysqlEscaper, QueryPreparer, SqlEscaper};

use super::parse_argument;

/// Arguments for the prepare command
#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Query format, e.g. "SELECT * FROM t WHERE id IN(%,d)"
    pub query: String,

    /// Arguments as JSON values (plain text is taken as a string)
    #[arg(conflicts_with = "list", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// All arguments as a single JSON array
    #[arg(long)]
    pub list: Option<String>,

    /// Seed for the placeholder escape marker
    #[arg(long)]
    pub seed: Option<String>,

    /// Replace placeholder escape markers with literal percent signs
    #[arg(long)]
    pub raw: bool,
}

/// Execute the prepare command
pub fn execute(args: PrepareArgs, config: &Config) -> Result<()> {
    let seed = args
        .seed
        .as_deref()
        .or(config.database.placeholder_seed.as_deref());
    let preparer = QueryPreparer::new(MysqlEscaper::from_seed(seed));

    let prepared = match &args.list {
        Some(list) => {
            let values: Vec<Argument> = serde_json::from_str(list)
                .with_context(|| format!("--list must be a JSON array of arguments: {}", list))?;
            preparer.prepare_list(&args.query, &values)
        }
        None => {
            let values = args
                .args
                .iter()
                .map(|raw| parse_argument(raw))
                .collect::<Result<Vec<_>>>()?;
            preparer.prepare(&args.query, &values)
        }
    }
    .context("Failed to prepare query")?;

    if args.raw {
        println!("{}", preparer.escaper().remove_placeholder_escape(&prepared));
    } else {
        println!("{}", prepared);
    }

    Ok(())
}
