//! Comment data models

use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored comment row as returned by a comment source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Unique comment identifier
    pub id: CommentId,
    /// Post the comment belongs to
    pub post_id: PostId,
    /// Parent comment (`None` or `0` for top-level comments)
    #[serde(default, deserialize_with = "parent_or_zero")]
    pub parent: Option<CommentId>,
    /// Display name of the author
    pub author: String,
    /// Email of the author
    #[serde(default)]
    pub author_email: Option<String>,
    /// Website of the author
    #[serde(default)]
    pub author_url: Option<String>,
    /// Comment body (HTML)
    pub content: String,
    /// Creation date (GMT)
    pub date_gmt: DateTime<Utc>,
    /// Moderation status
    #[serde(default)]
    pub status: CommentStatus,
    /// Registered user who wrote the comment
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Comment type
    #[serde(default)]
    pub kind: CommentKind,
}

impl CommentRecord {
    /// Check if this comment starts a thread
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this comment is publicly visible
    pub fn is_approved(&self) -> bool {
        self.status == CommentStatus::Approved
    }

    /// Hash handed to the author of a held comment so they can preview it
    pub fn moderation_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.id.to_string().as_bytes());
        hasher.update(self.date_gmt.to_rfc3339().as_bytes());
        hasher.finalize().to_hex().as_str()[..10].to_string()
    }
}

fn parent_or_zero<'de, D>(deserializer: D) -> Result<Option<CommentId>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<u64>::deserialize(deserializer)?;
    Ok(parent.filter(|id| *id != 0).map(CommentId))
}

/// Comment moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommentStatus {
    /// Visible to everyone
    #[default]
    #[serde(rename = "approved", alias = "approve")]
    Approved,
    /// Awaiting moderation
    #[serde(rename = "hold", alias = "pending")]
    Hold,
    /// Marked as spam
    #[serde(rename = "spam")]
    Spam,
    /// Moved to the trash
    #[serde(rename = "trash")]
    Trash,
}

impl CommentStatus {
    /// Stored name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Approved => "approved",
            CommentStatus::Hold => "hold",
            CommentStatus::Spam => "spam",
            CommentStatus::Trash => "trash",
        }
    }
}

/// Comment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// Regular comment
    #[default]
    Comment,
    /// Pingback from another site
    Pingback,
    /// Trackback from another site
    Trackback,
}

impl CommentKind {
    /// CSS class of the comment type
    pub fn css_class(&self) -> &'static str {
        match self {
            CommentKind::Comment => "comment",
            CommentKind::Pingback => "pingback",
            CommentKind::Trackback => "trackback",
        }
    }
}

/// A comment placed in a thread
///
/// Built once by [`CommentTree::build`](super::CommentTree::build); the node
/// exclusively owns its replies.
#[derive(Debug)]
pub struct CommentNode {
    /// The stored comment
    pub comment: CommentRecord,
    /// Nesting level, 1 for top-level comments
    pub depth: usize,
    /// 1-based rank among siblings
    pub position: usize,
    /// Number of siblings including this node
    pub sibling_count: usize,
    /// Direct replies in input order
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Comment identifier
    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    /// Check if the node has replies
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl Drop for CommentNode {
    fn drop(&mut self) {
        // Unlink replies one level at a time so long chains drop without recursion
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
