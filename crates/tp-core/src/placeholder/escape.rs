//! SQL driver escaping primitives

use uuid::Uuid;

/// String escaping and placeholder-escape marker supplied by the SQL driver
pub trait SqlEscaper {
    /// Escape a value for inclusion inside a quoted SQL string literal
    fn escape(&self, value: &str) -> String;

    /// Token standing in for a literal `%` in a prepared query
    fn placeholder_marker(&self) -> &str;

    /// Replace every literal `%` with the marker
    fn add_placeholder_escape(&self, query: &str) -> String {
        query.replace('%', self.placeholder_marker())
    }

    /// Turn markers back into `%` before the query is sent to the server
    fn remove_placeholder_escape(&self, query: &str) -> String {
        query.replace(self.placeholder_marker(), "%")
    }
}

/// MySQL-style escaper
///
/// Escapes NUL, newline, carriage return, backslash, quotes and Ctrl-Z with a
/// backslash. The marker is `{<blake3 hex>}` derived from a seed.
#[derive(Debug, Clone)]
pub struct MysqlEscaper {
    marker: String,
}

impl MysqlEscaper {
    /// Create an escaper with a marker unique to this instance
    pub fn new() -> Self {
        Self::with_seed(&Uuid::new_v4().to_string())
    }

    /// Create an escaper with a deterministic marker
    pub fn with_seed(seed: &str) -> Self {
        let hash = blake3::hash(seed.as_bytes());
        Self {
            marker: format!("{{{}}}", hash.to_hex()),
        }
    }

    /// Create an escaper from an optional configured seed
    pub fn from_seed(seed: Option<&str>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for MysqlEscaper {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlEscaper for MysqlEscaper {
    fn escape(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out
    }

    fn placeholder_marker(&self) -> &str {
        &self.marker
    }
}
