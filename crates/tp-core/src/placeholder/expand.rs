//! Implode expansion
//!
//! Rewrites a format so that every implode directive becomes one plain
//! directive per list element, and produces the flat argument list the
//! rewritten format expects.

use super::argument::{Argument, Scalar};
use super::token::{tokenize, Directive, FormatToken};
use crate::error::PlaceholderError;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Format and flat arguments produced by [`expand`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expansion {
    /// Format with implode directives flattened and positions renumbered
    pub format: String,
    /// Scalars in slot order
    pub args: Vec<Scalar>,
}

/// How a directive was bound during resolution
enum Piece<'a> {
    Text(FormatToken<'a>),
    Implicit { directive: Directive, count: usize },
    Positional { directive: Directive, position: usize },
}

/// Expand implode directives and renumber positional references.
///
/// Implicit directives consume arguments in textual order and fill the first
/// slots of the output list. Positional directives (`%N$d`) read the Nth
/// original argument without moving the implicit cursor; their values take
/// the last slots of the output list, overwriting unconsumed trailing
/// arguments, and the directives are renumbered to point at them.
///
/// Misuse is logged as incorrect usage and returned as an error.
pub fn expand(format: &str, args: &[Argument]) -> Result<Expansion, PlaceholderError> {
    expand_tokens(tokenize(format), args).map_err(|err| {
        warn!(target: "incorrect_usage", function = "expand", "{}", err);
        err
    })
}

fn expand_tokens(
    tokens: Vec<FormatToken<'_>>,
    args: &[Argument],
) -> Result<Expansion, PlaceholderError> {
    let mut pieces = Vec::with_capacity(tokens.len());
    let mut implicit: Vec<Scalar> = Vec::new();
    let mut positional: BTreeMap<usize, Vec<Scalar>> = BTreeMap::new();
    let mut cursor = 0;
    let mut placeholder = 0;

    for token in tokens {
        let directive = match token {
            FormatToken::Directive(directive) => directive,
            text => {
                pieces.push(Piece::Text(text));
                continue;
            }
        };
        placeholder += 1;

        match directive.position {
            None => {
                let arg = args
                    .get(cursor)
                    .ok_or(PlaceholderError::MissingArgument { placeholder })?;
                cursor += 1;
                let values = bind(&directive, arg, cursor)?;
                pieces.push(Piece::Implicit {
                    count: values.len(),
                    directive,
                });
                implicit.extend(values);
            }
            Some(position) => {
                let arg = args
                    .get(position - 1)
                    .ok_or(PlaceholderError::PositionOutOfRange {
                        position,
                        available: args.len(),
                    })?;
                let values = bind(&directive, arg, position)?;
                positional.entry(position).or_insert(values);
                pieces.push(Piece::Positional {
                    directive,
                    position,
                });
            }
        }
    }

    let trailing: Vec<Scalar> = args[cursor..].iter().flat_map(Argument::flatten).collect();
    let needed: usize = positional.values().map(Vec::len).sum();
    let kept = trailing.len().saturating_sub(needed);

    let mut out = implicit;
    out.extend(trailing.into_iter().take(kept));

    let mut slots = BTreeMap::new();
    for (position, values) in positional {
        slots.insert(position, (out.len() + 1, values.len()));
        out.extend(values);
    }

    let mut rewritten = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(token) => rewritten.push_str(&token.source_text()),
            Piece::Implicit { directive, count } => {
                if directive.implode {
                    let plain = directive.render(None);
                    rewritten.push_str(&vec![plain; count].join(","));
                } else {
                    rewritten.push_str(&directive.render(None));
                }
            }
            Piece::Positional {
                directive,
                position,
            } => {
                let (slot, count) = slots.get(&position).copied().unwrap_or((position, 1));
                if directive.implode {
                    let parts: Vec<String> = (0..count)
                        .map(|i| directive.render(Some(slot + i)))
                        .collect();
                    rewritten.push_str(&parts.join(","));
                } else {
                    rewritten.push_str(&directive.render(Some(slot)));
                }
            }
        }
    }

    Ok(Expansion {
        format: rewritten,
        args: out,
    })
}

/// Resolve the scalars a directive contributes for `arg`.
fn bind(
    directive: &Directive,
    arg: &Argument,
    position: usize,
) -> Result<Vec<Scalar>, PlaceholderError> {
    match (directive.implode, arg) {
        (true, Argument::Array(values)) => Ok(values.clone()),
        (true, Argument::Scalar(value)) => Err(PlaceholderError::ImplodeNonArray {
            value: value.to_text(),
        }),
        (false, Argument::Scalar(value)) => Ok(vec![value.clone()]),
        (false, Argument::Array(_)) => Err(PlaceholderError::ArrayForScalar { position }),
    }
}
