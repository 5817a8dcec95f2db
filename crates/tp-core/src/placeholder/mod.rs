//! Placeholder engine
//!
//! Prepares SQL statements from printf-style formats. Besides the usual
//! `%d`, `%f` and `%s` directives (with positions, padding, width and
//! precision), the format may contain implode directives such as `%,d`
//! that expand to one directive per element of a list argument.
//!
//! # Example
//!
//! ```ignore
//! use tp_core::placeholder::{expand, QueryPreparer};
//! use tp_core::sql_args;
//!
//! let expansion = expand("%,d", &sql_args![vec![1, 2, 3]])?;
//! assert_eq!(expansion.format, "%d,%d,%d");
//!
//! let sql = QueryPreparer::default().prepare("IN(%,s)", &sql_args![vec!["a", "b"]])?;
//! assert_eq!(sql, "IN('a','b')");
//! ```

mod argument;
mod escape;
mod expand;
mod prepare;
mod token;

pub use argument::{Argument, Scalar};
pub use escape::{MysqlEscaper, SqlEscaper};
pub use expand::{expand, Expansion};
pub use prepare::QueryPreparer;
pub use token::{count_directives, count_slots, tokenize, Conversion, Directive, FormatToken, Padding};
