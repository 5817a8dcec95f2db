//! Query preparation: expansion followed by escaped substitution

use super::argument::{Argument, Scalar};
use super::escape::{MysqlEscaper, SqlEscaper};
use super::expand::{expand, Expansion};
use super::token::{count_directives, count_slots, tokenize, Conversion, Directive, FormatToken};
use crate::error::PlaceholderError;
use tracing::warn;

/// Prepares SQL queries from printf-style formats and arguments
///
/// ```ignore
/// let preparer = QueryPreparer::new(MysqlEscaper::new());
/// let sql = preparer.prepare("SELECT * FROM t WHERE id IN(%,d)", &sql_args![vec![1, 2, 3]])?;
/// assert_eq!(sql, "SELECT * FROM t WHERE id IN(1,2,3)");
/// ```
#[derive(Debug, Clone)]
pub struct QueryPreparer<E = MysqlEscaper> {
    escaper: E,
}

impl<E: SqlEscaper> QueryPreparer<E> {
    /// Create a preparer around a driver escaper
    pub fn new(escaper: E) -> Self {
        Self { escaper }
    }

    /// Get the driver escaper
    pub fn escaper(&self) -> &E {
        &self.escaper
    }

    /// Prepare a query from variadic arguments
    pub fn prepare(&self, query: &str, args: &[Argument]) -> Result<String, PlaceholderError> {
        self.prepare_args(query, args, false)
    }

    /// Prepare a query whose arguments were supplied as a single list
    ///
    /// Same as [`prepare`](Self::prepare), except that a query with exactly
    /// one placeholder refuses a list of several arguments.
    pub fn prepare_list(
        &self,
        query: &str,
        args: &[Argument],
    ) -> Result<String, PlaceholderError> {
        self.prepare_args(query, args, true)
    }

    /// Prepare a query, falling back to the fully escaped raw query on misuse
    pub fn prepare_lossy(&self, query: &str, args: &[Argument]) -> String {
        match self.prepare(query, args) {
            Ok(prepared) => prepared,
            Err(_) => self.escaper.add_placeholder_escape(query),
        }
    }

    fn prepare_args(
        &self,
        query: &str,
        args: &[Argument],
        passed_as_list: bool,
    ) -> Result<String, PlaceholderError> {
        let query = query.replace("'%s'", "%s").replace("\"%s\"", "%s");
        let expansion = expand(&query, args)?;

        let tokens = tokenize(&expansion.format);
        let arg_count = expansion.args.len();
        if passed_as_list && count_directives(&tokens) == 1 && arg_count != 1 {
            let err = PlaceholderError::SinglePlaceholderArray;
            warn!(target: "incorrect_usage", function = "prepare", "{}", err);
            return Err(err);
        }

        let placeholders = count_slots(&tokens);
        if placeholders != arg_count {
            warn!(
                target: "incorrect_usage",
                function = "prepare",
                "The query does not contain the correct number of placeholders ({}) for the number of arguments passed ({})",
                placeholders,
                arg_count
            );
        }

        self.interpolate(&expansion)
    }

    /// Substitute escaped values into an expanded format
    ///
    /// Every literal percent in the result, including those inside values,
    /// is replaced with the driver's placeholder-escape marker.
    pub fn interpolate(&self, expansion: &Expansion) -> Result<String, PlaceholderError> {
        let marker = self.escaper.placeholder_marker();
        let mut out = String::with_capacity(expansion.format.len());
        let mut cursor = 0;
        let mut placeholder = 0;

        for token in tokenize(&expansion.format) {
            match token {
                FormatToken::Literal(text) => out.push_str(text),
                FormatToken::EscapedPercent | FormatToken::StrayPercent => out.push_str(marker),
                FormatToken::Directive(directive) => {
                    placeholder += 1;
                    let value = match directive.position {
                        Some(position) => expansion.args.get(position - 1),
                        None => {
                            cursor += 1;
                            expansion.args.get(cursor - 1)
                        }
                    };
                    let value = value.ok_or_else(|| {
                        let err = PlaceholderError::MissingArgument { placeholder };
                        warn!(target: "incorrect_usage", function = "interpolate", "{}", err);
                        err
                    })?;
                    out.push_str(&self.format_value(&directive, value));
                }
            }
        }

        Ok(out)
    }

    fn format_value(&self, directive: &Directive, value: &Scalar) -> String {
        let text = match directive.conversion {
            Conversion::Int => value.to_int().to_string(),
            Conversion::Float | Conversion::FloatNonLocale => {
                let f = value.to_float();
                match directive.precision {
                    Some(precision) => format!("{:.*}", precision, f),
                    None => f.to_string(),
                }
            }
            Conversion::Str => {
                let text = value.to_text();
                let text = match directive.precision {
                    Some(precision) => text.chars().take(precision).collect(),
                    None => text,
                };
                self.escaper.escape(&text)
            }
        };

        let padded = self.escaper.add_placeholder_escape(&pad(&text, directive));
        if directive.conversion == Conversion::Str && directive.is_bare() {
            format!("'{}'", padded)
        } else {
            padded
        }
    }
}

impl Default for QueryPreparer<MysqlEscaper> {
    fn default() -> Self {
        Self::new(MysqlEscaper::new())
    }
}

/// Pad `text` to the directive width.
fn pad(text: &str, directive: &Directive) -> String {
    let Some(width) = directive.width else {
        return text.to_string();
    };
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let fill_char = directive.padding.map(|p| p.fill()).unwrap_or(' ');
    let fill: String = std::iter::repeat(fill_char).take(width - len).collect();

    if directive.left_align {
        return format!("{}{}", text, fill);
    }

    let numeric = directive.conversion != Conversion::Str;
    match text.strip_prefix('-') {
        Some(digits) if numeric && fill_char == '0' => format!("-{}{}", fill, digits),
        _ => format!("{}{}", fill, text),
    }
}
