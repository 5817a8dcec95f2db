//! tp-storage - Storage library for threadprep
//!
//! This crate provides the file-backed comment store.

mod comment_store;

pub use comment_store::{CommentFile, JsonCommentStore, CURRENT_SCHEMA_VERSION};
