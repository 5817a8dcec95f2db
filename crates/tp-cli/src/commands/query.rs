//! Query command
//!
//! Show the comment query a comment list would run.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tp_core::comment::{build_query_vars, Commenter, QueryContext};
use tp_core::config::Config;
use tp_core::types::{PostId, UserId};
use tp_storage::JsonCommentStore;

/// Which post and page the comment list is for
#[derive(Debug, Clone, Args)]
pub struct ContextArgs {
    /// Post whose comments are listed (all posts if omitted)
    #[arg(long)]
    pub post: Option<u64>,

    /// Requested comment page; follows the request page when given
    #[arg(long)]
    pub page: Option<u32>,
}

impl ContextArgs {
    pub fn to_context(&self) -> QueryContext {
        QueryContext {
            post_id: self.post.map(PostId),
            inherit: self.page.is_some(),
            requested_page: self.page,
        }
    }
}

/// Who is looking at the comment list
#[derive(Debug, Clone, Args)]
pub struct VisitorArgs {
    /// Logged-in user id
    #[arg(long)]
    pub user: Option<u64>,

    /// Commenter email remembered from a previous comment
    #[arg(long)]
    pub email: Option<String>,

    /// Moderation hash from a comment preview link
    #[arg(long)]
    pub hash: Option<String>,
}

impl VisitorArgs {
    pub fn to_commenter(&self) -> Commenter {
        Commenter {
            user_id: self.user.map(UserId),
            email: self.email.clone(),
            unapproved_hash: self.hash.clone(),
        }
    }
}

/// Arguments for the query command
#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    #[command(flatten)]
    pub visitor: VisitorArgs,

    /// Comment store used to count pages (default: platform data directory)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

/// Open the given store, or the default one
pub fn open_store(path: Option<&PathBuf>) -> Result<JsonCommentStore> {
    match path {
        Some(path) => JsonCommentStore::open(path)
            .with_context(|| format!("Failed to open comment store {}", path.display())),
        None => JsonCommentStore::default_location().with_context(|| {
            format!(
                "Failed to open comment store {}",
                JsonCommentStore::default_path().display()
            )
        }),
    }
}

/// Execute the query command
pub fn execute(args: QueryArgs, config: &Config) -> Result<()> {
    let store = open_store(args.store.as_ref())?;

    let vars = build_query_vars(
        &args.context.to_context(),
        &config.discussion,
        &args.visitor.to_commenter(),
        &store,
    )
    .context("Failed to build comment query")?;

    println!("{}", serde_json::to_string_pretty(&vars)?);
    Ok(())
}
