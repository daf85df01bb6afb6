//! Error types for TOML encoding.
//!
//! Every error aborts the encode call that raised it. Nothing is downgraded
//! to a default value: a value TOML cannot represent is an error unless the
//! caller configured an alternative (a custom rule, or
//! [`EncodeOptions::with_strict_floats`](crate::EncodeOptions::with_strict_floats)).
//!
//! ## Error Categories
//!
//! - **No encoder found**: a value whose type no rule in the registry handles
//! - **Unrepresentable value**: a known type whose value has no TOML form
//!   (null, `NaN` under strict floats, integers wider than 64 bits, ...)
//! - **Duplicate key**: two entries of one table render to the same key
//! - **Sink write**: the output writer failed
//!
//! Errors raised while walking the document carry the [`KeyPath`] of the
//! offending value.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlw::{encode, toml_value, Error};
//!
//! let value = toml_value!({ "ratio": (f64::NAN) });
//! match encode(&value) {
//!     Err(Error::UnrepresentableValue { path, .. }) => assert_eq!(path.to_string(), "ratio"),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use crate::key::KeyPath;
use std::{fmt, io};
use thiserror::Error;

/// Represents all possible errors that can occur while encoding TOML.
#[derive(Debug, Error)]
pub enum Error {
    /// No rule in the registry matched the value.
    #[error("no encoder found for value of type `{type_name}` at `{path}`")]
    NoEncoderFound { type_name: String, path: KeyPath },

    /// The value has a known type but no TOML representation.
    #[error("value at `{path}` cannot be represented in TOML: {reason}")]
    UnrepresentableValue { path: KeyPath, reason: String },

    /// Two entries of the same table render to the same key.
    #[error("duplicate key in table `{path}`: `{first}` and `{second}` both render as {rendered}")]
    DuplicateKey {
        path: KeyPath,
        first: String,
        second: String,
        rendered: String,
    },

    /// Writing to the output sink failed.
    #[error("failed to write TOML output: {0}")]
    SinkWrite(#[from] io::Error),

    /// Custom error raised through serde.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an unrepresentable-value error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlw::{key::KeyPath, Error};
    ///
    /// let err = Error::unrepresentable(KeyPath::from_iter(["a", "b"]), "TOML has no null value");
    /// assert!(err.to_string().contains("`a.b`"));
    /// ```
    pub fn unrepresentable<R: fmt::Display>(path: KeyPath, reason: R) -> Self {
        Error::UnrepresentableValue {
            path,
            reason: reason.to_string(),
        }
    }

    /// Creates a no-encoder-found error.
    pub fn no_encoder(type_name: &str, path: KeyPath) -> Self {
        Error::NoEncoderFound {
            type_name: type_name.to_string(),
            path,
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The path of the value that caused the error, if known.
    #[must_use]
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Error::NoEncoderFound { path, .. }
            | Error::UnrepresentableValue { path, .. }
            | Error::DuplicateKey { path, .. } => Some(path),
            Error::SinkWrite(_) | Error::Custom(_) => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_path() {
        let err = Error::no_encoder("Widget", KeyPath::from_iter(["parts", "left"]));
        assert_eq!(
            err.to_string(),
            "no encoder found for value of type `Widget` at `parts.left`"
        );

        let err = Error::DuplicateKey {
            path: KeyPath::root(),
            first: "a".to_string(),
            second: "a".to_string(),
            rendered: "a".to_string(),
        };
        assert!(err.to_string().contains("`(root)`"));
    }

    #[test]
    fn test_io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, Error::SinkWrite(_)));
        assert!(err.path().is_none());
    }
}
