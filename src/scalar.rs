//! Rendering of primitive values into TOML literals.
//!
//! The free functions render one literal each; [`ScalarEncoder`] picks
//! between them according to [`EncodeOptions`] and attaches the key path to
//! any failure.

use crate::key::KeyPath;
use crate::node::Scalar;
use crate::{Datetime, EncodeOptions, Error, Result};

/// Where a rendered scalar is going to appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The value of a `key = value` line.
    Line,
    /// Inside an inline array or inline table.
    Inline,
}

/// Renders a basic (double-quoted) string.
///
/// # Examples
///
/// ```rust
/// use serde_tomlw::scalar::basic_string;
///
/// assert_eq!(basic_string("plain"), "\"plain\"");
/// assert_eq!(basic_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
/// assert_eq!(basic_string("\u{1}"), "\"\\u0001\"");
/// ```
#[must_use]
pub fn basic_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    push_escaped(&mut out, s, false);
    out.push('"');
    out
}

/// Renders a literal (single-quoted) string, or `None` if `s` contains a
/// character a literal string cannot hold (`'`, or a control character
/// other than tab).
#[must_use]
pub fn literal_string(s: &str) -> Option<String> {
    let representable = s
        .chars()
        .all(|ch| ch != '\'' && (ch == '\t' || !is_control(ch)));
    representable.then(|| format!("'{}'", s))
}

/// Renders a multi-line basic string.
///
/// Newlines are written literally; a carriage return is always escaped, so
/// `\r\n` in the input survives a round trip unchanged.
#[must_use]
pub fn multiline_basic_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 7);
    // a newline right after the opening delimiter is trimmed by parsers
    out.push_str("\"\"\"\n");
    push_escaped(&mut out, s, true);
    out.push_str("\"\"\"");
    out
}

#[inline]
fn is_control(ch: char) -> bool {
    ch < '\u{20}' || ch == '\u{7f}'
}

fn push_escaped(out: &mut String, s: &str, keep_newlines: bool) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' if keep_newlines => out.push('\n'),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if is_control(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
}

/// Renders an integer in decimal form.
#[inline]
#[must_use]
pub fn integer(value: i64) -> String {
    value.to_string()
}

/// Renders a float, or explains why it cannot be rendered.
///
/// Finite values use the shortest representation that reads back to the
/// same `f64`, always with a fractional part or an exponent so that the
/// literal stays a float.
///
/// # Examples
///
/// ```rust
/// use serde_tomlw::scalar::float;
///
/// assert_eq!(float(1.0, true).unwrap(), "1.0");
/// assert_eq!(float(1e-7, true).unwrap(), "1e-7");
/// assert!(float(f64::NAN, true).is_err());
/// assert_eq!(float(f64::NEG_INFINITY, false).unwrap(), "-inf");
/// ```
pub fn float(value: f64, strict: bool) -> std::result::Result<String, &'static str> {
    if value.is_nan() {
        return if strict {
            Err("NaN is not allowed with strict floats")
        } else {
            Ok("nan".to_string())
        };
    }
    if value.is_infinite() {
        return match (strict, value > 0.0) {
            (true, _) => Err("infinity is not allowed with strict floats"),
            (false, true) => Ok("inf".to_string()),
            (false, false) => Ok("-inf".to_string()),
        };
    }
    let mut text = format!("{:?}", value);
    if !text.contains(|c| c == '.' || c == 'e' || c == 'E') {
        text.push_str(".0");
    }
    Ok(text)
}

/// Renders a date, time or date-time, or explains why RFC 3339 cannot hold it.
pub fn datetime(value: &Datetime) -> std::result::Result<String, String> {
    value.check_representable()?;
    Ok(value.to_string())
}

/// Renders scalars according to a set of [`EncodeOptions`].
#[derive(Clone, Copy, Debug)]
pub struct ScalarEncoder<'o> {
    options: &'o EncodeOptions,
}

impl<'o> ScalarEncoder<'o> {
    #[must_use]
    pub fn new(options: &'o EncodeOptions) -> Self {
        ScalarEncoder { options }
    }

    /// Renders `scalar`; `path` is only used for error reporting.
    pub fn encode(&self, scalar: &Scalar, placement: Placement, path: &KeyPath) -> Result<String> {
        match scalar {
            Scalar::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            Scalar::Integer(i) => Ok(integer(*i)),
            Scalar::Float(f) => float(*f, self.options.strict_floats)
                .map_err(|reason| Error::unrepresentable(path.clone(), reason)),
            Scalar::String(s) => Ok(self.string(s, placement)),
            Scalar::Datetime(dt) => {
                datetime(dt).map_err(|reason| Error::unrepresentable(path.clone(), reason))
            }
        }
    }

    fn string(&self, s: &str, placement: Placement) -> String {
        if self.options.multiline_strings && placement == Placement::Line && s.contains('\n') {
            return multiline_basic_string(s);
        }
        if self.options.literal_strings {
            if let Some(literal) = literal_string(s) {
                return literal;
            }
        }
        basic_string(s)
    }
}
