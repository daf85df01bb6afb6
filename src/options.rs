//! Configuration options for TOML encoding.
//!
//! [`EncodeOptions`] controls the few places where more than one valid TOML
//! rendering exists, and whether non-finite floats are accepted at all.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlw::{toml_value, Encoder, EncodeOptions};
//!
//! let value = toml_value!({ "path": "C:\\Users\\alice" });
//!
//! let options = EncodeOptions::new().with_literal_strings(true);
//! let toml = Encoder::new().with_options(options).encode(&value).unwrap();
//! assert_eq!(toml, "path = 'C:\\Users\\alice'\n");
//! ```

/// Configuration options for TOML encoding.
///
/// # Examples
///
/// ```rust
/// use serde_tomlw::EncodeOptions;
///
/// // Defaults: strict floats, basic strings only
/// let options = EncodeOptions::new();
/// assert!(options.strict_floats);
///
/// // Allow nan/inf and prefer literal strings
/// let options = EncodeOptions::new()
///     .with_strict_floats(false)
///     .with_literal_strings(true);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Reject `NaN` and infinities instead of writing `nan`/`inf`.
    ///
    /// The TOML grammar has these literals, but many consumers refuse them.
    pub strict_floats: bool,
    /// Write strings in literal (single-quoted) form whenever that form can
    /// hold them unchanged.
    pub literal_strings: bool,
    /// Write strings containing newlines as multi-line basic strings when
    /// they are the value of a `key = value` line.
    pub multiline_strings: bool,
    /// Text placed between the items of an inline array.
    ///
    /// It must be a single comma surrounded only by spaces, tabs and
    /// newlines. Inline tables always use `, `.
    pub array_separator: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            strict_floats: true,
            literal_strings: false,
            multiline_strings: false,
            array_separator: ", ".to_string(),
        }
    }
}

impl EncodeOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that accept everything TOML can express, including `nan` and
    /// `inf`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlw::EncodeOptions;
    ///
    /// assert!(!EncodeOptions::permissive().strict_floats);
    /// ```
    #[must_use]
    pub fn permissive() -> Self {
        EncodeOptions {
            strict_floats: false,
            ..Default::default()
        }
    }

    /// Sets whether non-finite floats are rejected.
    #[must_use]
    pub fn with_strict_floats(mut self, strict: bool) -> Self {
        self.strict_floats = strict;
        self
    }

    /// Sets whether literal strings are preferred when safe.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlw::{toml_value, Encoder, EncodeOptions};
    ///
    /// let encoder = Encoder::new().with_options(EncodeOptions::new().with_literal_strings(true));
    ///
    /// // A single quote cannot appear in a literal string, so this stays basic.
    /// let toml = encoder.encode(&toml_value!({ "name": "O'Brien" })).unwrap();
    /// assert_eq!(toml, "name = \"O'Brien\"\n");
    /// ```
    #[must_use]
    pub fn with_literal_strings(mut self, literal: bool) -> Self {
        self.literal_strings = literal;
        self
    }

    /// Sets whether multi-line strings are used for values containing newlines.
    #[must_use]
    pub fn with_multiline_strings(mut self, multiline: bool) -> Self {
        self.multiline_strings = multiline;
        self
    }

    /// Sets the separator written between inline array items.
    ///
    /// An invalid separator is reported when encoding starts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlw::{toml_value, Encoder, EncodeOptions};
    ///
    /// let options = EncodeOptions::new().with_array_separator(",\t");
    /// let encoder = Encoder::new().with_options(options);
    /// let toml = encoder.encode(&toml_value!({ "n": [1, 2] })).unwrap();
    /// assert_eq!(toml, "n = [1,\t2]\n");
    /// ```
    #[must_use]
    pub fn with_array_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.array_separator = separator.into();
        self
    }
}

pub(crate) fn is_valid_array_separator(separator: &str) -> bool {
    let trimmed = separator.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'));
    let bare_cr = separator.replace("\r\n", "\n").contains('\r');
    trimmed == "," && !bare_cr
}
