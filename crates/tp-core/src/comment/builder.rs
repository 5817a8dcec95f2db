//! Comment builder for fluent API

use super::model::{CommentKind, CommentRecord, CommentStatus};
use crate::error::{Result, ThreadPrepError};
use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};

/// Builder for creating comment records with fluent API
pub struct CommentBuilder {
    id: CommentId,
    post_id: PostId,
    parent: Option<CommentId>,
    author: Option<String>,
    author_email: Option<String>,
    author_url: Option<String>,
    content: Option<String>,
    date_gmt: Option<DateTime<Utc>>,
    status: CommentStatus,
    user_id: Option<UserId>,
    kind: CommentKind,
}

impl CommentBuilder {
    /// Create a new builder for a top-level comment
    pub fn new(id: u64, post_id: u64) -> Self {
        Self {
            id: CommentId(id),
            post_id: PostId(post_id),
            parent: None,
            author: None,
            author_email: None,
            author_url: None,
            content: None,
            date_gmt: None,
            status: CommentStatus::Approved,
            user_id: None,
            kind: CommentKind::Comment,
        }
    }

    /// Create a new builder for a reply
    pub fn reply(id: u64, post_id: u64, parent: u64) -> Self {
        Self::new(id, post_id).parent(parent)
    }

    /// Set the parent comment
    pub fn parent(mut self, parent: u64) -> Self {
        self.parent = (parent != 0).then_some(CommentId(parent));
        self
    }

    /// Set the author name
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the author email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    /// Set the author website
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.author_url = Some(url.into());
        self
    }

    /// Set the comment content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the creation date (defaults to now)
    pub fn date(mut self, date_gmt: DateTime<Utc>) -> Self {
        self.date_gmt = Some(date_gmt);
        self
    }

    /// Set the moderation status
    pub fn status(mut self, status: CommentStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the comment as awaiting moderation
    pub fn held(self) -> Self {
        self.status(CommentStatus::Hold)
    }

    /// Set the registered user who wrote the comment
    pub fn user(mut self, user_id: u64) -> Self {
        self.user_id = Some(UserId(user_id));
        self
    }

    /// Set the comment type
    pub fn kind(mut self, kind: CommentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build the comment record
    pub fn build(self) -> Result<CommentRecord> {
        if self.id.0 == 0 {
            return Err(ThreadPrepError::Validation(
                "Comment ID must be positive".to_string(),
            ));
        }

        if self.parent == Some(self.id) {
            return Err(ThreadPrepError::Validation(format!(
                "Comment {} cannot reply to itself",
                self.id
            )));
        }

        let content = self.content.ok_or_else(|| {
            ThreadPrepError::Validation("Comment content is required".to_string())
        })?;

        if content.trim().is_empty() {
            return Err(ThreadPrepError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        Ok(CommentRecord {
            id: self.id,
            post_id: self.post_id,
            parent: self.parent,
            author: self.author.unwrap_or_default(),
            author_email: self.author_email,
            author_url: self.author_url,
            content,
            date_gmt: self.date_gmt.unwrap_or_else(Utc::now),
            status: self.status,
            user_id: self.user_id,
            kind: self.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_builder() {
        let comment = CommentBuilder::new(1, 10)
            .author("Test")
            .content("Hello world")
            .build()
            .unwrap();

        assert_eq!(comment.id, CommentId(1));
        assert_eq!(comment.post_id, PostId(10));
        assert_eq!(comment.content, "Hello world");
        assert_eq!(comment.status, CommentStatus::Approved);
        assert!(comment.is_top_level());
    }

    #[test]
    fn test_reply_builder() {
        let comment = CommentBuilder::reply(2, 10, 1)
            .content("Reply")
            .held()
            .user(7)
            .build()
            .unwrap();

        assert_eq!(comment.parent, Some(CommentId(1)));
        assert_eq!(comment.status, CommentStatus::Hold);
        assert_eq!(comment.user_id, Some(UserId(7)));
    }

    #[test]
    fn test_zero_parent_is_top_level() {
        let comment = CommentBuilder::new(3, 10)
            .parent(0)
            .content("Top")
            .build()
            .unwrap();
        assert!(comment.is_top_level());
    }

    #[test]
    fn test_builder_without_content_fails() {
        assert!(CommentBuilder::new(1, 10).build().is_err());
        assert!(CommentBuilder::new(1, 10).content("   ").build().is_err());
    }

    #[test]
    fn test_self_reply_fails() {
        let result = CommentBuilder::reply(4, 10, 4).content("Loop").build();
        assert!(result.is_err());
    }
}
