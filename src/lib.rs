//! # serde_tomlw
//!
//! A TOML encoder with pluggable type rules and serde support.
//!
//! ## What it does
//!
//! `serde_tomlw` turns a tree of values into a TOML 1.0 document. It only
//! writes TOML; reading it back is left to a parser such as the `toml`
//! crate. Encoding happens in three stages:
//!
//! 1. A [`Registry`] lowers the input [`Value`] into a [`Node`] tree. Each
//!    value is handled by the first matching rule, so custom types and
//!    overrides plug in without touching the encoder.
//! 2. The planner decides which tables become `[header]` sections, which
//!    arrays become `[[array-of-tables]]`, and what is written inline.
//! 3. The [`DocumentWriter`] streams the resulting lines to any
//!    [`io::Write`] sink.
//!
//! ## Key Features
//!
//! - **Valid by construction**: scalars come before sub-tables, keys are
//!   quoted when needed, duplicate keys are rejected
//! - **Serde Compatible**: encode any `#[derive(Serialize)]` type
//! - **Extensible**: register encoding rules per Rust type, per value kind or
//!   per predicate, globally or for a single [`Encoder`]
//! - **Precise errors**: every failure carries the key path of the offending
//!   value
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use serde_tomlw::to_string;
//!
//! #[derive(Serialize)]
//! struct Package {
//!     name: String,
//!     version: String,
//!     authors: Vec<String>,
//!     dependencies: Dependencies,
//! }
//!
//! #[derive(Serialize)]
//! struct Dependencies {
//!     serde: String,
//! }
//!
//! let package = Package {
//!     name: "demo".to_string(),
//!     version: "0.1.0".to_string(),
//!     authors: vec!["Alice".to_string()],
//!     dependencies: Dependencies { serde: "1.0".to_string() },
//! };
//!
//! let toml = to_string(&package).unwrap();
//! assert_eq!(
//!     toml,
//!     "name = \"demo\"\nversion = \"0.1.0\"\nauthors = [\"Alice\"]\n\n[dependencies]\nserde = \"1.0\"\n"
//! );
//! ```
//!
//! ### Dynamic Values with toml_value! Macro
//!
//! ```rust
//! use serde_tomlw::{encode, toml_value};
//!
//! let doc = toml_value!({
//!     "title": "TOML Example",
//!     "products": [
//!         { "name": "Hammer", "sku": 738594937 },
//!         { "name": "Nail", "sku": 284758393 }
//!     ]
//! });
//!
//! let toml = encode(&doc).unwrap();
//! assert!(toml.contains("[[products]]\nname = \"Hammer\""));
//! ```
//!
//! ## Custom Types
//!
//! Values the built-in rules do not know travel as [`Value::Extension`] and
//! need a rule:
//!
//! ```rust
//! use serde_tomlw::{Encoder, Node, Registry, TomlMap, Value};
//! use std::time::Duration;
//!
//! let mut registry = Registry::new();
//! registry.register::<Duration, _>(|d, _cx| Ok(Node::integer(d.as_millis() as i64)));
//!
//! let mut root = TomlMap::new();
//! root.insert("timeout_ms".to_string(), Value::extension(Duration::from_secs(2)));
//!
//! let toml = Encoder::with_registry(registry).encode(&Value::Table(root)).unwrap();
//! assert_eq!(toml, "timeout_ms = 2000\n");
//! ```
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Encoding a serde struct
//! - **`dynamic_values.rs`** - Building and encoding `Value` trees
//! - **`custom_rules.rs`** - Registering rules for your own types
//! - **`custom_options.rs`** - Literal strings, multi-line strings, non-finite floats
//!
//! Run any example with: `cargo run --example <name>`

#[macro_use]
pub mod macros;

pub mod datetime;
pub mod encoder;
pub mod error;
pub mod key;
pub mod map;
pub mod node;
pub mod options;
pub mod planner;
pub mod registry;
pub mod scalar;
pub mod ser;
pub mod value;
pub mod writer;

pub use datetime::{Datetime, DatetimeParseError};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use key::KeyPath;
pub use map::TomlMap;
pub use node::{Node, Scalar};
pub use options::EncodeOptions;
pub use registry::{register_global, register_global_kind, Lowering, Registry, Rule};
pub use ser::{to_value, ValueSerializer};
pub use value::{Extension, Value, ValueKind};
pub use writer::DocumentWriter;

use serde::Serialize;
use std::{fs, io, path::Path};

/// Encode a [`Value`] into a TOML document, using a snapshot of the
/// process-wide registry and default options.
///
/// # Examples
///
/// ```rust
/// use serde_tomlw::{encode, toml_value};
///
/// let toml = encode(&toml_value!({ "a": 1, "t": { "b": true } })).unwrap();
/// assert_eq!(toml, "a = 1\n\n[t]\nb = true\n");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<String> {
    Encoder::new().encode(value)
}

/// Encode a [`Value`] into `writer`, line by line.
///
/// On error the writer may already hold part of the document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_writer<W: io::Write>(value: &Value, writer: W) -> Result<()> {
    Encoder::new().encode_to_writer(value, writer)
}

/// Serialize any `T: Serialize` to a TOML string.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_tomlw::to_string;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "x = 1\ny = 2\n");
/// ```
///
/// # Errors
///
/// Fails if `T` does not serialize to a table, or contains a value TOML
/// cannot hold (`None`, non-finite floats, integers beyond 64 bits).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, EncodeOptions::default())
}

/// Serialize any `T: Serialize` to a TOML string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_tomlw::{to_string_with_options, EncodeOptions};
///
/// #[derive(Serialize)]
/// struct Limits { max: f64 }
///
/// let limits = Limits { max: f64::INFINITY };
/// let toml = to_string_with_options(&limits, EncodeOptions::permissive()).unwrap();
/// assert_eq!(toml, "max = inf\n");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Encoder::new().with_options(options).serialize(value)
}

/// Serialize any `T: Serialize` as TOML into an [`io::Write`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, EncodeOptions::default())
}

/// Serialize any `T: Serialize` as TOML into an [`io::Write`] with custom
/// options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: EncodeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    Encoder::new()
        .with_options(options)
        .serialize_to_writer(value, writer)
}

/// Serialize any `T: Serialize` as TOML, write it to the file at `path` and
/// return the text.
///
/// The file is only created once the whole document has been encoded, so a
/// failed encode leaves the filesystem untouched.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file<P, T>(path: P, value: &T) -> Result<String>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    fs::write(path.as_ref(), &text)?;
    tracing::debug!(path = %path.as_ref().display(), bytes = text.len(), "wrote document");
    Ok(text)
}
