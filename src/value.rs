//! Dynamic value representation for TOML documents.
//!
//! [`Value`] is the caller-facing value graph handed to the encoder. Besides
//! the TOML data types it has a [`Value::Null`] variant, which is rejected at
//! encode time, and [`Value::Extension`], which carries an arbitrary Rust
//! value that a [`Registry`](crate::Registry) rule knows how to encode.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_tomlw::{toml_value, Value};
//!
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let table = toml_value!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(table.is_table());
//! ```
//!
//! ### Carrying Domain Objects
//!
//! ```rust
//! use serde_tomlw::Value;
//!
//! #[derive(Debug)]
//! struct Celsius(f64);
//!
//! let value = Value::extension(Celsius(21.5));
//! assert_eq!(value.downcast_ref::<Celsius>().map(|c| c.0), Some(21.5));
//! ```
//!
//! ### Converting from Rust Types
//!
//! ```rust
//! use serde_tomlw::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value: Value = to_value(&Point { x: 10, y: 20 }).unwrap();
//! assert_eq!(value.as_table().map(|t| t.len()), Some(2));
//! ```

use crate::datetime::DATETIME_FIELD;
use crate::{Datetime, TomlMap};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A dynamically-typed value to be encoded as TOML.
///
/// # Examples
///
/// ```rust
/// use serde_tomlw::{Value, ValueKind};
///
/// let value = Value::Float(2.5);
/// assert_eq!(value.kind(), ValueKind::Float);
/// assert_eq!(value.type_name(), "float");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Datetime(Datetime),
    Array(Vec<Value>),
    Table(TomlMap),
    Extension(Extension),
}

/// The discriminant of a [`Value`], with datetimes split by TOML form.
///
/// Used to match built-in encoding rules and to override them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
    Array,
    Table,
    Extension,
}

impl ValueKind {
    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::OffsetDateTime => "offset date-time",
            ValueKind::LocalDateTime => "local date-time",
            ValueKind::LocalDate => "local date",
            ValueKind::LocalTime => "local time",
            ValueKind::Array => "array",
            ValueKind::Table => "table",
            ValueKind::Extension => "extension",
        }
    }
}

/// A type-erased domain object carried inside a [`Value`].
///
/// Extensions have no built-in encoding (except [`BigInt`]); a rule
/// registered with [`Registry::register`](crate::Registry::register) for the
/// payload's type turns them into TOML.
///
/// Two extensions compare equal only if they share the same allocation.
#[derive(Clone)]
pub struct Extension {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Extension {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Extension {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// The Rust type name of the payload.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn payload_type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extension<{}>", self.type_name)
    }
}

impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Value {
    /// Wraps a domain object so it can travel through the value graph.
    pub fn extension<T: Any + Send + Sync>(value: T) -> Self {
        Value::Extension(Extension::new(value))
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Datetime(Datetime::OffsetDateTime(_)) => ValueKind::OffsetDateTime,
            Value::Datetime(Datetime::LocalDateTime(_)) => ValueKind::LocalDateTime,
            Value::Datetime(Datetime::LocalDate(_)) => ValueKind::LocalDate,
            Value::Datetime(Datetime::LocalTime(_)) => ValueKind::LocalTime,
            Value::Array(_) => ValueKind::Array,
            Value::Table(_) => ValueKind::Table,
            Value::Extension(_) => ValueKind::Extension,
        }
    }

    /// The type name reported in diagnostics: the TOML kind for built-in
    /// values, the Rust type name for extensions.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Extension(ext) => ext.type_name(),
            other => other.kind().name(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&TomlMap> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// If the value is an extension carrying a `T`, returns it.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Extension(ext) => ext.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Datetime(dt) => dt.serialize(serializer),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Table(table) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(table.len()))?;
                for (k, v) in table.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Extension(ext) => {
                let big = ext.downcast_ref::<BigInt>();
                if let Some(i) = big.and_then(|big| i128::try_from(big).ok()) {
                    serializer.serialize_i128(i)
                } else if let Some(u) = big.and_then(|big| u128::try_from(big).ok()) {
                    serializer.serialize_u128(u)
                } else {
                    Err(serde::ser::Error::custom(format!(
                        "extension value `{}` cannot be serialized through serde",
                        ext.type_name()
                    )))
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid TOML value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = TomlMap::new();
                while let Some(key) = map.next_key::<String>()? {
                    // the `toml` crate hands datetimes over as a one-field map
                    if values.is_empty() && key == DATETIME_FIELD {
                        let raw: String = map.next_value()?;
                        let datetime = raw.parse::<Datetime>().map_err(de::Error::custom)?;
                        return Ok(Value::Datetime(datetime));
                    }
                    let value = map.next_value()?;
                    values.insert(key, value);
                }
                Ok(Value::Table(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

/// Values above `i64::MAX` become [`BigInt`] extensions, which the encoder
/// rejects unless a custom rule handles them.
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::from(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::extension(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<chrono::DateTime<chrono::FixedOffset>> for Value {
    fn from(value: chrono::DateTime<chrono::FixedOffset>) -> Self {
        Value::Datetime(value.into())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Datetime(value.into())
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(value: chrono::NaiveDateTime) -> Self {
        Value::Datetime(value.into())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(value: chrono::NaiveDate) -> Self {
        Value::Datetime(value.into())
    }
}

impl From<chrono::NaiveTime> for Value {
    fn from(value: chrono::NaiveTime) -> Self {
        Value::Datetime(value.into())
    }
}

impl From<Datetime> for Value {
    fn from(value: Datetime) -> Self {
        Value::Datetime(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<TomlMap> for Value {
    fn from(value: TomlMap) -> Self {
        Value::Table(value)
    }
}
