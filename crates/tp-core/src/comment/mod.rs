//! Comment threads
//!
//! Builds the query for a comment list, assembles fetched rows into
//! threads and renders them as nested ordered lists.

pub mod block;
pub mod builder;
pub mod model;
pub mod query;
pub mod render;
pub mod source;
pub mod tree;

pub use block::{CommentTemplateBlock, RequestState};
pub use builder::CommentBuilder;
pub use model::*;
pub use query::{
    build_query_vars, select_page, CommentQuery, Commenter, QueryContext, QueryVars,
    UnapprovedKey,
};
pub use render::{CommentListRenderer, CommentTemplate, DefaultCommentTemplate, RenderState};
pub use source::CommentSource;
pub use tree::CommentTree;
