//! The encoder: registry, planner and writer wired together.

use crate::planner::Planner;
use crate::{DocumentWriter, EncodeOptions, Error, Registry, Result, Value};
use serde::Serialize;
use std::io;

/// Encodes values with a fixed registry and set of options.
///
/// [`Encoder::new`] takes a snapshot of the process-wide registry; rules
/// registered globally afterwards are not seen by this encoder. Use
/// [`Encoder::with_registry`] for a fully isolated registry.
///
/// # Examples
///
/// ```rust
/// use serde_tomlw::{toml_value, Encoder, EncodeOptions};
///
/// let encoder = Encoder::new().with_options(EncodeOptions::permissive());
/// let toml = encoder.encode(&toml_value!({ "limit": (f64::INFINITY) })).unwrap();
/// assert_eq!(toml, "limit = inf\n");
/// ```
#[derive(Clone, Debug)]
pub struct Encoder {
    registry: Registry,
    options: EncodeOptions,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Encoder::with_registry(Registry::global())
    }

    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Encoder {
            registry,
            options: EncodeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to this encoder's own registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes `value` into a TOML document.
    pub fn encode(&self, value: &Value) -> Result<String> {
        let mut buf = Vec::with_capacity(256);
        self.encode_to_writer(value, &mut buf)?;
        String::from_utf8(buf).map_err(Error::custom)
    }

    /// Encodes `value`, writing each line to `writer` as soon as it is
    /// planned.
    ///
    /// On error, whatever was already written stays in the sink.
    pub fn encode_to_writer<W: io::Write>(&self, value: &Value, writer: W) -> Result<()> {
        let root = self.registry.lower(value)?;
        let mut sink = DocumentWriter::new(writer);
        Planner::new(&self.options).plan(&root, &mut sink)?;
        sink.flush()
    }

    /// Converts `value` through serde and encodes the result.
    pub fn serialize<T: ?Sized + Serialize>(&self, value: &T) -> Result<String> {
        self.encode(&crate::to_value(value)?)
    }

    pub fn serialize_to_writer<T, W>(&self, value: &T, writer: W) -> Result<()>
    where
        T: ?Sized + Serialize,
        W: io::Write,
    {
        self.encode_to_writer(&crate::to_value(value)?, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, ValueKind};

    #[test]
    fn test_per_encoder_registry() {
        let mut encoder = Encoder::with_registry(Registry::new());
        encoder
            .registry_mut()
            .register_kind(ValueKind::Integer, |value, _| {
                Ok(Node::string(format!("#{}", value.as_integer().unwrap_or_default())))
            });

        let value = toml_value!({ "n": 7 });
        assert_eq!(encoder.encode(&value).unwrap(), "n = \"#7\"\n");
        assert_eq!(Encoder::new().encode(&value).unwrap(), "n = 7\n");
    }

    #[test]
    fn test_encode_to_writer_streams() {
        let mut out = Vec::new();
        Encoder::new()
            .encode_to_writer(&toml_value!({ "a": 1, "t": { "b": 2 } }), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a = 1\n\n[t]\nb = 2\n");
    }

    #[test]
    fn test_partial_output_on_error() {
        let mut out = Vec::new();
        let value = toml_value!({ "ok": 1, "bad": (f64::NAN) });
        let err = Encoder::new().encode_to_writer(&value, &mut out).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { .. }));
        assert_eq!(String::from_utf8(out).unwrap(), "ok = 1\n");
    }

    #[test]
    fn test_non_table_root() {
        let err = Encoder::new().encode(&Value::from(1)).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { .. }));
    }
}
