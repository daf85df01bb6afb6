//! Conversion of any `T: Serialize` into a [`Value`].
//!
//! The encoder works on [`Value`] graphs. [`ValueSerializer`] is the serde
//! bridge that builds one, after which the regular registry, planner and
//! writer take over.
//!
//! ## Mapping
//!
//! - Integers that fit in `i64` become [`Value::Integer`]; larger `u64`,
//!   `i128` and `u128` values become `BigInt` extensions, which the encoder
//!   rejects unless a rule handles them.
//! - `None`, `()` and unit structs become [`Value::Null`], which TOML cannot
//!   hold. Use `#[serde(skip_serializing_if = "Option::is_none")]` for
//!   optional fields.
//! - Unit variants become strings; newtype, tuple and struct variants become
//!   a table with the variant name as its only key.
//! - Map keys may be strings, chars, integers or booleans.
//! - [`Datetime`](crate::Datetime) values (and `toml::value::Datetime`)
//!   are recognised and kept as datetimes.
//!
//! ```rust
//! use serde::Serialize;
//! use serde_tomlw::{to_value, Value};
//!
//! #[derive(Serialize)]
//! enum Shape {
//!     Circle { r: f64 },
//!     Point,
//! }
//!
//! let circle = to_value(&Shape::Circle { r: 1.5 }).unwrap();
//! assert_eq!(circle.as_table().unwrap().get("Circle").unwrap().as_table().unwrap().get("r"),
//!            Some(&Value::Float(1.5)));
//! assert_eq!(to_value(&Shape::Point).unwrap(), Value::from("Point"));
//! ```

use crate::datetime::{DATETIME_FIELD, DATETIME_STRUCT};
use crate::key::{render_key, KeyPath};
use crate::{Datetime, Error, Result, TomlMap, Value};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// Serializer whose output is a [`Value`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: TomlMap,
    current_key: Option<String>,
}

pub enum SerializeStruct {
    Table(SerializeMap),
    Datetime(Option<Datetime>),
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: SerializeMap,
}

/// Converts `value` into a [`Value`].
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

fn wide_integer<I>(v: I) -> Value
where
    I: Copy + Into<BigInt> + TryInto<i64>,
{
    match v.try_into() {
        Ok(i) => Value::Integer(i),
        Err(_) => Value::from(v.into()),
    }
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = TomlMap::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Table(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(wide_integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(wide_integer(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_entry(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeStruct> {
        if name == DATETIME_STRUCT {
            Ok(SerializeStruct::Datetime(None))
        } else {
            Ok(SerializeStruct::Table(SerializeMap::new(len)))
        }
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: SerializeMap::new(len),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            map: TomlMap::with_capacity(capacity),
            current_key: None,
        }
    }

    /// Inserts an entry, rejecting repeated keys (e.g. from `#[serde(flatten)]`).
    fn insert(&mut self, key: String, value: Value) -> Result<()> {
        if self.map.contains_key(&key) {
            return Err(Error::DuplicateKey {
                path: KeyPath::root(),
                rendered: render_key(&key).into_owned(),
                first: key.clone(),
                second: key,
            });
        }
        self.map.insert(key, value);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(single_entry(self.variant, Value::Array(self.vec)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(Error::custom("map keys must be strings")),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let value = to_value(value)?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Table(self.map))
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match self {
            SerializeStruct::Table(map) => map.insert(key.to_string(), to_value(value)?),
            SerializeStruct::Datetime(slot) if key == DATETIME_FIELD => {
                let raw = match to_value(value)? {
                    Value::String(raw) => raw,
                    _ => return Err(Error::custom("datetime field must be a string")),
                };
                *slot = Some(raw.parse::<Datetime>().map_err(Error::custom)?);
                Ok(())
            }
            SerializeStruct::Datetime(_) => {
                Err(Error::custom(format!("unexpected datetime field `{}`", key)))
            }
        }
    }

    fn end(self) -> Result<Value> {
        match self {
            SerializeStruct::Table(map) => Ok(Value::Table(map.map)),
            SerializeStruct::Datetime(Some(datetime)) => Ok(Value::Datetime(datetime)),
            SerializeStruct::Datetime(None) => Err(Error::custom("datetime value is missing")),
        }
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        Ok(single_entry(self.variant, Value::Table(self.map.map)))
    }
}
