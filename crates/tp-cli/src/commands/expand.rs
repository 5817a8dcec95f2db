//! Expand command
//!
//! Show how implode placeholders expand for the given arguments.

use anyhow::{Context, Result};
use clap::Args;
use tp_core::placeholder::expand;

use super::parse_argument;

/// Arguments for the expand command
#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Format, e.g. "%d,%,d,%d"
    pub format: String,

    /// Arguments as JSON values (plain text is taken as a string)
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Execute the expand command
pub fn execute(args: ExpandArgs) -> Result<()> {
    let values = args
        .args
        .iter()
        .map(|raw| parse_argument(raw))
        .collect::<Result<Vec<_>>>()?;

    let expansion = expand(&args.format, &values).context("Failed to expand format")?;

    let json = if args.compact {
        serde_json::to_string(&expansion)?
    } else {
        serde_json::to_string_pretty(&expansion)?
    };
    println!("{}", json);

    Ok(())
}
