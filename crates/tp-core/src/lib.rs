//! tp-core - Core library for threadprep
//!
//! This crate provides the placeholder engine used to prepare SQL statements
//! and the comment thread builder used to query and render comment lists.

pub mod comment;
pub mod config;
pub mod error;
pub mod placeholder;
pub mod types;

pub use error::{PlaceholderError, Result, ThreadPrepError};
pub use types::*;
