//! Format string tokenizer
//!
//! Splits a printf-style query format into literal runs, percent escapes and
//! directives. Directive grammar after `%`, in order:
//!
//! ```text
//! [N$] [-] ['c | 0] [width] [.precision] [,] conversion
//! ```
//!
//! where `conversion` is one of `d`, `f`, `F`, `s` and `,` marks an implode
//! directive. A `%` that does not start a valid directive is kept as a stray
//! literal and scanning resumes right after it.

use std::collections::HashSet;
use std::fmt::Write as _;

/// Value conversion requested by a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `%d`
    Int,
    /// `%f`
    Float,
    /// `%F`
    FloatNonLocale,
    /// `%s`
    Str,
}

impl Conversion {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Conversion::Int),
            'f' => Some(Conversion::Float),
            'F' => Some(Conversion::FloatNonLocale),
            's' => Some(Conversion::Str),
            _ => None,
        }
    }

    /// Conversion character
    pub fn as_char(&self) -> char {
        match self {
            Conversion::Int => 'd',
            Conversion::Float => 'f',
            Conversion::FloatNonLocale => 'F',
            Conversion::Str => 's',
        }
    }
}

/// Pad specifier; the default pad character is a space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// `0`
    Zero,
    /// `'c`
    Custom(char),
}

impl Padding {
    /// Character used to fill up to the width
    pub fn fill(&self) -> char {
        match self {
            Padding::Zero => '0',
            Padding::Custom(c) => *c,
        }
    }
}

/// A parsed `%...` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Explicit 1-based argument position (`%2$d`)
    pub position: Option<usize>,
    /// Pad on the right instead of the left (`%-5s`)
    pub left_align: bool,
    /// Pad specifier
    pub padding: Option<Padding>,
    /// Minimum width
    pub width: Option<usize>,
    /// Decimal places for floats, maximum length for strings
    pub precision: Option<usize>,
    /// Expand against a list argument (`%,d`)
    pub implode: bool,
    /// Conversion character
    pub conversion: Conversion,
}

impl Directive {
    /// A directive with only a conversion character
    pub fn new(conversion: Conversion) -> Self {
        Self {
            position: None,
            left_align: false,
            padding: None,
            width: None,
            precision: None,
            implode: false,
            conversion,
        }
    }

    /// Check if the directive carries no modifier besides its conversion
    pub fn is_bare(&self) -> bool {
        self.position.is_none()
            && !self.left_align
            && self.padding.is_none()
            && self.width.is_none()
            && self.precision.is_none()
            && !self.implode
    }

    /// Write the directive without the implode marker, bound to `position`
    pub fn render(&self, position: Option<usize>) -> String {
        let mut out = String::from("%");
        if let Some(position) = position {
            let _ = write!(out, "{}$", position);
        }
        if self.left_align {
            out.push('-');
        }
        match self.padding {
            Some(Padding::Zero) => out.push('0'),
            Some(Padding::Custom(c)) => {
                out.push('\'');
                out.push(c);
            }
            None => {}
        }
        if let Some(width) = self.width {
            let _ = write!(out, "{}", width);
        }
        if let Some(precision) = self.precision {
            let _ = write!(out, ".{}", precision);
        }
        out.push(self.conversion.as_char());
        out
    }
}

/// One unit of a tokenized format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken<'a> {
    /// Text without any `%`
    Literal(&'a str),
    /// `%%`
    EscapedPercent,
    /// A `%` that does not start a directive
    StrayPercent,
    /// A substitution directive
    Directive(Directive),
}

impl FormatToken<'_> {
    /// Source text this token was parsed from, with directives re-rendered
    pub fn source_text(&self) -> String {
        match self {
            FormatToken::Literal(text) => (*text).to_string(),
            FormatToken::EscapedPercent => "%%".to_string(),
            FormatToken::StrayPercent => "%".to_string(),
            FormatToken::Directive(d) => {
                let mut text = d.render(d.position);
                if d.implode {
                    text.insert(text.len() - 1, ',');
                }
                text
            }
        }
    }
}

/// Tokenize a format string
pub fn tokenize(format: &str) -> Vec<FormatToken<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < format.len() {
        let rest = &format[pos..];
        if !rest.starts_with('%') {
            let end = rest.find('%').unwrap_or(rest.len());
            tokens.push(FormatToken::Literal(&rest[..end]));
            pos += end;
            continue;
        }

        if rest[1..].starts_with('%') {
            tokens.push(FormatToken::EscapedPercent);
            pos += 2;
            continue;
        }

        match parse_directive(&rest[1..]) {
            Some((directive, consumed)) => {
                tokens.push(FormatToken::Directive(directive));
                pos += 1 + consumed;
            }
            None => {
                tokens.push(FormatToken::StrayPercent);
                pos += 1;
            }
        }
    }

    tokens
}

/// Number of directives in a tokenized format
pub fn count_directives(tokens: &[FormatToken<'_>]) -> usize {
    tokens
        .iter()
        .filter(|t| matches!(t, FormatToken::Directive(_)))
        .count()
}

/// Number of distinct argument slots the directives of a format read.
///
/// Implicit directives take the next slot in turn; a positional directive
/// reads its own slot, so `%1$s %1$s` references a single argument.
pub fn count_slots(tokens: &[FormatToken<'_>]) -> usize {
    let mut next = 0;
    let mut slots = HashSet::new();
    for token in tokens {
        if let FormatToken::Directive(directive) = token {
            let slot = directive.position.unwrap_or_else(|| {
                next += 1;
                next
            });
            slots.insert(slot);
        }
    }
    slots.len()
}

/// Byte cursor over the text following a `%`
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> Option<&'a str> {
        let text = self.text;
        let start = self.pos;
        let len = text[start..].bytes().take_while(u8::is_ascii_digit).count();
        self.pos += len;
        if len > 0 {
            Some(&text[start..start + len])
        } else {
            None
        }
    }
}

/// Parse one directive from the text after `%`.
///
/// Returns the directive and the number of bytes consumed, or `None` when the
/// text does not form a valid directive.
fn parse_directive(text: &str) -> Option<(Directive, usize)> {
    let mut cursor = Cursor { text, pos: 0 };

    let position = parse_position(&mut cursor);
    let left_align = cursor.eat('-');

    let padding = if cursor.eat('\'') {
        Some(Padding::Custom(cursor.bump()?))
    } else if cursor.eat('0') {
        Some(Padding::Zero)
    } else {
        None
    };

    let width = match cursor.digits() {
        Some(digits) => Some(digits.parse().ok()?),
        None => None,
    };

    let precision = if cursor.eat('.') {
        Some(cursor.digits()?.parse().ok()?)
    } else {
        None
    };

    let implode = cursor.eat(',');
    let conversion = Conversion::from_char(cursor.bump()?)?;

    Some((
        Directive {
            position,
            left_align,
            padding,
            width,
            precision,
            implode,
            conversion,
        },
        cursor.pos,
    ))
}

/// Parse an `N$` prefix, rewinding when the digits are not followed by `$`.
fn parse_position(cursor: &mut Cursor<'_>) -> Option<usize> {
    let start = cursor.pos;
    let position = cursor
        .digits()
        .filter(|digits| !digits.starts_with('0'))
        .and_then(|digits| digits.parse::<usize>().ok());

    match position {
        Some(position) if cursor.eat('$') => Some(position),
        _ => {
            cursor.pos = start;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directive(conversion: Conversion) -> FormatToken<'static> {
        FormatToken::Directive(Directive::new(conversion))
    }

    #[test]
    fn test_plain_directives() {
        assert_eq!(
            tokenize("f%do%fo%sb"),
            vec![
                FormatToken::Literal("f"),
                directive(Conversion::Int),
                FormatToken::Literal("o"),
                directive(Conversion::Float),
                FormatToken::Literal("o"),
                directive(Conversion::Str),
                FormatToken::Literal("b"),
            ]
        );
    }

    #[test]
    fn test_implode_directive() {
        let tokens = tokenize("IN(%,d)");
        assert_eq!(tokens.len(), 3);
        match &tokens[1] {
            FormatToken::Directive(d) => {
                assert!(d.implode);
                assert_eq!(d.conversion, Conversion::Int);
                assert_eq!(d.render(None), "%d");
            }
            other => panic!("expected directive, got {:?}", other),
        }
    }

    #[test]
    fn test_escaped_percent_is_not_implode() {
        assert_eq!(
            tokenize("foo%%,dbar"),
            vec![
                FormatToken::Literal("foo"),
                FormatToken::EscapedPercent,
                FormatToken::Literal(",dbar"),
            ]
        );
    }

    #[test]
    fn test_triple_percent() {
        assert_eq!(
            tokenize("%%% %"),
            vec![
                FormatToken::EscapedPercent,
                FormatToken::StrayPercent,
                FormatToken::Literal(" "),
                FormatToken::StrayPercent,
            ]
        );
    }

    #[test]
    fn test_position_followed_by_escape() {
        let tokens = tokenize("%1$d%%");
        assert_eq!(tokens.len(), 2);
        match &tokens[0] {
            FormatToken::Directive(d) => assert_eq!(d.position, Some(1)),
            other => panic!("expected directive, got {:?}", other),
        }
        assert_eq!(tokens[1], FormatToken::EscapedPercent);

        assert_eq!(
            tokenize("%%1$d%%"),
            vec![
                FormatToken::EscapedPercent,
                FormatToken::Literal("1$d"),
                FormatToken::EscapedPercent,
            ]
        );
    }

    #[test]
    fn test_width_and_custom_padding() {
        let tokens = tokenize("%'#5s");
        match &tokens[0] {
            FormatToken::Directive(d) => {
                assert_eq!(d.padding, Some(Padding::Custom('#')));
                assert_eq!(d.width, Some(5));
                assert_eq!(d.render(None), "%'#5s");
            }
            other => panic!("expected directive, got {:?}", other),
        }

        let tokens = tokenize("%05.2f");
        match &tokens[0] {
            FormatToken::Directive(d) => {
                assert_eq!(d.padding, Some(Padding::Zero));
                assert_eq!(d.width, Some(5));
                assert_eq!(d.precision, Some(2));
            }
            other => panic!("expected directive, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_is_not_a_pad_without_conversion() {
        assert_eq!(
            tokenize("'%'%%s%s"),
            vec![
                FormatToken::Literal("'"),
                FormatToken::StrayPercent,
                FormatToken::Literal("'"),
                FormatToken::EscapedPercent,
                FormatToken::Literal("s"),
                directive(Conversion::Str),
            ]
        );
    }

    #[test]
    fn test_invalid_directives_are_stray() {
        assert_eq!(tokenize("%0$d")[0], FormatToken::StrayPercent);
        assert_eq!(tokenize("%x")[0], FormatToken::StrayPercent);
        assert_eq!(tokenize("100%")[1], FormatToken::StrayPercent);
        assert_eq!(tokenize("%.s")[0], FormatToken::StrayPercent);
    }

    #[test]
    fn test_source_text_round_trip() {
        for format in ["%2$,d", "%-'x10.3s", "%%", "a%b"] {
            let rebuilt: String = tokenize(format).iter().map(|t| t.source_text()).collect();
            assert_eq!(rebuilt, format);
        }
    }

    #[test]
    fn test_multibyte_text() {
        let tokens = tokenize("é%'ü3sñ");
        assert_eq!(tokens[0], FormatToken::Literal("é"));
        match &tokens[1] {
            FormatToken::Directive(d) => assert_eq!(d.padding, Some(Padding::Custom('ü'))),
            other => panic!("expected directive, got {:?}", other),
        }
        assert_eq!(tokens[2], FormatToken::Literal("ñ"));
        assert_eq!(count_directives(&tokens), 1);
    }

    #[test]
    fn test_count_slots() {
        assert_eq!(count_slots(&tokenize("%s %d")), 2);
        assert_eq!(count_slots(&tokenize("%1$s %1$s")), 1);
        assert_eq!(count_directives(&tokenize("%1$s %1$s")), 2);
        assert_eq!(count_slots(&tokenize("%d %1$d %2$d")), 2);
        assert_eq!(count_slots(&tokenize("%% %3$s")), 1);
        assert_eq!(count_slots(&tokenize("no directives")), 0);
    }
}
