//! Render command
//!
//! Render the comment list of a post from a comment store.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tp_core::comment::{CommentTemplateBlock, RequestState};
use tp_core::config::Config;

use super::query::{open_store, ContextArgs, VisitorArgs};

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    #[command(flatten)]
    pub visitor: VisitorArgs,

    /// Comment store (default: platform data directory)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Output file path (stdout if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute the render command
pub fn execute(args: RenderArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let store = open_store(args.store.as_ref())?;
    let block = CommentTemplateBlock::new(&store, config);

    let mut request = RequestState::default();
    let html = block
        .try_render(
            &args.context.to_context(),
            &args.visitor.to_commenter(),
            &mut request,
        )
        .context("Failed to render comments")?;

    match &args.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            writeln!(file, "{}", html)?;
            eprintln!("{} Wrote comment list to {}", "✓".green(), path.display());
        }
        None => println!("{}", html),
    }

    if let Some(page) = request.current_page {
        eprintln!("{} {}", "Comment page:".dimmed(), page);
    }

    Ok(())
}
