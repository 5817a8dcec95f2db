//! Comment fetch collaborator

use super::model::CommentRecord;
use super::query::{self, CommentQuery};
use crate::error::Result;

/// Backend that can answer comment queries
///
/// Implementations must follow the threaded paging contract of
/// [`select_page`](query::select_page): paging counts top-level threads and
/// replies travel with their thread.
pub trait CommentSource {
    /// Fetch the records a query selects, in display order
    fn fetch(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>>;

    /// Count the top-level threads a query selects, ignoring paging
    fn count_threads(&self, query: &CommentQuery) -> Result<usize>;
}

impl CommentSource for [CommentRecord] {
    fn fetch(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>> {
        Ok(query::select_page(self, query))
    }

    fn count_threads(&self, query: &CommentQuery) -> Result<usize> {
        Ok(query::count_threads(self, query))
    }
}

impl CommentSource for Vec<CommentRecord> {
    fn fetch(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>> {
        self.as_slice().fetch(query)
    }

    fn count_threads(&self, query: &CommentQuery) -> Result<usize> {
        self.as_slice().count_threads(query)
    }
}
