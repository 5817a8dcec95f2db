//! Comment query construction and evaluation

use super::model::{CommentRecord, CommentStatus};
use super::source::CommentSource;
use crate::config::{DefaultPage, DiscussionSettings, SortOrder};
use crate::error::Result;
use crate::types::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Column comments are ordered by
pub const ORDER_BY_DATE: &str = "comment_date_gmt";
/// Status value selecting approved comments
pub const STATUS_APPROVE: &str = "approve";
/// Hierarchy mode fetching whole threads
pub const HIERARCHY_THREADED: &str = "threaded";

/// Comment query arguments
///
/// Absent optional fields are left out when serialized so the output only
/// carries the arguments that apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentQuery {
    pub orderby: String,
    pub order: SortOrder,
    pub status: String,
    pub no_found_rows: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_unapproved: Option<Vec<UnapprovedKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    pub hierarchical: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paged: Option<u32>,
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self {
            orderby: ORDER_BY_DATE.to_string(),
            order: SortOrder::Asc,
            status: STATUS_APPROVE.to_string(),
            no_found_rows: false,
            include_unapproved: None,
            post_id: None,
            hierarchical: HIERARCHY_THREADED.to_string(),
            number: None,
            paged: None,
        }
    }
}

/// Identifies the visitor's own comments awaiting moderation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnapprovedKey {
    /// Comments written by a registered user
    User(UserId),
    /// Comments matching an author email or moderation hash
    Author(String),
}

/// Where the comment list is rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    /// Post whose comments are listed
    pub post_id: Option<PostId>,
    /// Follow the page of the surrounding request
    pub inherit: bool,
    /// Comment page requested by the visitor
    pub requested_page: Option<u32>,
}

impl QueryContext {
    /// Context for a single post
    pub fn for_post(post_id: u64) -> Self {
        Self {
            post_id: Some(PostId(post_id)),
            ..Self::default()
        }
    }

    /// Follow the request page
    pub fn inheriting(mut self, requested_page: Option<u32>) -> Self {
        self.inherit = true;
        self.requested_page = requested_page;
        self
    }
}

/// Identity of the current visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commenter {
    /// Logged-in user
    pub user_id: Option<UserId>,
    /// Email remembered from a previous comment
    pub email: Option<String>,
    /// Moderation hash from a preview link
    pub unapproved_hash: Option<String>,
}

impl Commenter {
    /// Anonymous visitor
    pub fn anonymous() -> Self {
        Self::default()
    }

    fn unapproved_key(&self) -> Option<UnapprovedKey> {
        if let Some(user_id) = self.user_id {
            return Some(UnapprovedKey::User(user_id));
        }
        let present = |key: &&String| !key.is_empty();
        self.email
            .as_ref()
            .filter(present)
            .or(self.unapproved_hash.as_ref().filter(present))
            .map(|key| UnapprovedKey::Author(key.clone()))
    }
}

/// Query arguments plus the page to publish as the current comment page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryVars {
    pub query: CommentQuery,
    /// Set only when the page was chosen by default rather than requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

/// Build the comment query for a comment list.
///
/// With paging enabled the page is, in order of preference: the requested
/// page when the context inherits the request, page 1 for `oldest`, or the
/// last page for `newest` (never below 1). `counter` is only consulted for
/// the `newest` case.
pub fn build_query_vars<S>(
    context: &QueryContext,
    settings: &DiscussionSettings,
    commenter: &Commenter,
    counter: &S,
) -> Result<QueryVars>
where
    S: CommentSource + ?Sized,
{
    let mut query = CommentQuery {
        order: settings.comment_order,
        include_unapproved: commenter.unapproved_key().map(|key| vec![key]),
        post_id: context.post_id,
        ..CommentQuery::default()
    };
    let mut current_page = None;

    let per_page = settings.comments_per_page;
    if settings.page_comments && per_page > 0 {
        query.number = Some(per_page);

        let requested = context
            .requested_page
            .filter(|page| context.inherit && *page > 0);

        let paged = match (requested, settings.default_comments_page) {
            (Some(page), _) => page,
            (None, DefaultPage::Oldest) => 1,
            (None, DefaultPage::Newest) => {
                let threads = counter.count_threads(&query)?;
                let pages = threads.div_ceil(per_page as usize);
                debug!("{} threads over {} pages", threads, pages);
                u32::try_from(pages).unwrap_or(u32::MAX).max(1)
            }
        };

        query.paged = Some(paged);
        if requested.is_none() {
            current_page = Some(paged);
        }
    }

    Ok(QueryVars {
        query,
        current_page,
    })
}

impl CommentQuery {
    /// Check if a record is selected by this query, ignoring paging
    pub fn matches(&self, record: &CommentRecord) -> bool {
        if let Some(post_id) = self.post_id {
            if record.post_id != post_id {
                return false;
            }
        }

        match record.status {
            CommentStatus::Approved => true,
            CommentStatus::Hold => self.includes_unapproved(record),
            CommentStatus::Spam | CommentStatus::Trash => false,
        }
    }

    fn includes_unapproved(&self, record: &CommentRecord) -> bool {
        let Some(keys) = &self.include_unapproved else {
            return false;
        };
        keys.iter().any(|key| match key {
            UnapprovedKey::User(user_id) => record.user_id == Some(*user_id),
            UnapprovedKey::Author(author) => {
                record.author_email.as_deref() == Some(author.as_str())
                    || record.moderation_hash() == *author
            }
        })
    }

    /// Offset and limit over top-level threads, if paged
    fn window(&self) -> Option<(usize, usize)> {
        let number = self.number.filter(|n| *n > 0)? as usize;
        let page = self.paged.unwrap_or(1).max(1) as usize;
        Some(((page - 1) * number, number))
    }
}

/// Count the top-level threads a query selects
pub fn count_threads<'a, I>(records: I, query: &CommentQuery) -> usize
where
    I: IntoIterator<Item = &'a CommentRecord>,
{
    records
        .into_iter()
        .filter(|record| record.is_top_level() && query.matches(record))
        .count()
}

/// Apply a query to a full comment list.
///
/// Records are ordered by date then id in the query direction. Paging counts
/// top-level threads only; every selected thread comes back with all of its
/// matching replies.
pub fn select_page<'a, I>(records: I, query: &CommentQuery) -> Vec<CommentRecord>
where
    I: IntoIterator<Item = &'a CommentRecord>,
{
    let mut matched: Vec<&CommentRecord> = records
        .into_iter()
        .filter(|record| query.matches(record))
        .collect();
    matched.sort_by(|a, b| (a.date_gmt, a.id).cmp(&(b.date_gmt, b.id)));
    if query.order == SortOrder::Desc {
        matched.reverse();
    }

    let threads = matched.iter().filter(|record| record.is_top_level());
    let mut selected: HashSet<CommentId> = match query.window() {
        Some((offset, limit)) => threads.skip(offset).take(limit).map(|r| r.id).collect(),
        None => threads.map(|r| r.id).collect(),
    };

    let mut replies: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
    for record in &matched {
        if let Some(parent) = record.parent {
            replies.entry(parent).or_default().push(record.id);
        }
    }

    let mut pending: Vec<CommentId> = selected.iter().copied().collect();
    while let Some(id) = pending.pop() {
        for &reply in replies.get(&id).into_iter().flatten() {
            if selected.insert(reply) {
                pending.push(reply);
            }
        }
    }

    matched
        .into_iter()
        .filter(|record| selected.contains(&record.id))
        .cloned()
        .collect()
}
