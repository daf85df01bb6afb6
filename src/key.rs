//! Key rendering and key paths.
//!
//! TOML keys are written bare when every character is an ASCII letter, digit,
//! `-` or `_`. Anything else (including the empty key) is written as a basic
//! quoted string using the same escaping as string values.
//!
//! ```rust
//! use serde_tomlw::key::{render_key, render_path};
//!
//! assert_eq!(render_key("name"), "name");
//! assert_eq!(render_key("first name"), "\"first name\"");
//! assert_eq!(render_path(["servers", "alpha.local"]), "servers.\"alpha.local\"");
//! ```

use crate::scalar;
use std::borrow::Cow;
use std::fmt;

/// Returns `true` if `key` can be written without quotes.
#[inline]
#[must_use]
pub fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Renders a single key segment, quoting it only when required.
#[must_use]
pub fn render_key(key: &str) -> Cow<'_, str> {
    if is_bare_key(key) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(scalar::basic_string(key))
    }
}

/// Renders a dotted key path such as a table header.
#[must_use]
pub fn render_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&render_key(segment.as_ref()));
    }
    out
}

/// One step in a [`KeyPath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// The location of a value inside the document, used for table headers and
/// error diagnostics.
///
/// Segments are pushed while descending and popped on the way back up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<PathSegment>);

impl KeyPath {
    #[must_use]
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    #[inline]
    pub fn push_key(&mut self, key: &str) {
        self.0.push(PathSegment::Key(key.to_string()));
    }

    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The header text for this path: keys only, array indices dropped.
    ///
    /// Inside an array of tables, `[items.sub]` always refers to the most
    /// recently opened `[[items]]` element, so indices never appear.
    #[must_use]
    pub fn header(&self) -> String {
        render_path(self.0.iter().filter_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        }))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(&render_key(key))?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeyPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        KeyPath(
            iter.into_iter()
                .map(|s| PathSegment::Key(s.as_ref().to_string()))
                .collect(),
        )
    }
}
