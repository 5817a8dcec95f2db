//! Arguments bound to placeholder directives

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value bound to a directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Integer form used by `%d`
    ///
    /// Booleans become 0/1, floats truncate and strings contribute their
    /// leading integer (0 when there is none).
    pub fn to_int(&self) -> i64 {
        match self {
            Scalar::Null => 0,
            Scalar::Bool(b) => i64::from(*b),
            Scalar::Int(i) => *i,
            Scalar::Float(f) if f.is_finite() => f.trunc() as i64,
            Scalar::Float(_) => 0,
            Scalar::Str(s) => leading_number(s, false)
                .and_then(|n| n.parse::<i64>().ok())
                .unwrap_or(0),
        }
    }

    /// Float form used by `%f`
    pub fn to_float(&self) -> f64 {
        match self {
            Scalar::Null => 0.0,
            Scalar::Bool(b) => f64::from(u8::from(*b)),
            Scalar::Int(i) => *i as f64,
            Scalar::Float(f) => *f,
            Scalar::Str(s) => leading_number(s, true)
                .and_then(|n| n.parse::<f64>().ok())
                .unwrap_or(0.0),
        }
    }

    /// String form used by `%s` and by diagnostics
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null | Scalar::Bool(false) => String::new(),
            Scalar::Bool(true) => "1".to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Longest numeric prefix of `s` after leading whitespace.
fn leading_number(s: &str, allow_fraction: bool) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 || end > digits_start {
            end = frac_end;
        }
    }
    let number = &s[..end];
    if number.trim_start_matches(['+', '-']).trim_matches('.').is_empty() {
        None
    } else {
        Some(number.trim_end_matches('.'))
    }
}

macro_rules! scalar_from {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant($conv(value))
                }
            }

            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Scalar(Scalar::from(value))
                }
            }
        )+
    };
}

scalar_from!(Int: i32, i64, u8, u16, u32 => i64::from);
scalar_from!(Float: f32, f64 => f64::from);
scalar_from!(Bool: bool => std::convert::identity);
scalar_from!(Str: String => std::convert::identity);

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Scalar(Scalar::from(value))
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// One top-level argument: either a scalar or a list of scalars
///
/// Lists are only accepted by implode directives (`%,d`), which expand to
/// one directive per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

impl Argument {
    /// Build a list argument
    pub fn array<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Self {
        Argument::Array(values.into_iter().map(Into::into).collect())
    }

    /// Check if this argument is a list
    pub fn is_array(&self) -> bool {
        matches!(self, Argument::Array(_))
    }

    /// Scalars this argument contributes when spread into a flat list
    pub fn flatten(&self) -> Vec<Scalar> {
        match self {
            Argument::Scalar(s) => vec![s.clone()],
            Argument::Array(values) => values.clone(),
        }
    }
}

impl From<Scalar> for Argument {
    fn from(value: Scalar) -> Self {
        Argument::Scalar(value)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Argument {
    fn from(values: Vec<T>) -> Self {
        Argument::array(values)
    }
}

/// Build a `Vec<Argument>` from mixed scalars and lists
///
/// ```ignore
/// let args = sql_args![1, vec![97, 98, 99], "x", Scalar::Null];
/// ```
#[macro_export]
macro_rules! sql_args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::placeholder::Argument::from($arg)),*]
    };
}
