/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Table entries keep the order they are written in. Any other expression
/// is converted with `Value::from`; wrap expressions that span several
/// tokens (negative numbers, paths, calls) in parentheses.
///
/// ```rust
/// use serde_tomlw::{toml_value, Value};
///
/// let config = toml_value!({
///     "title": "example",
///     "retries": 3,
///     "offset": (-1),
///     "ports": [8000, 8001],
///     "owner": { "name": "Tom" }
/// });
///
/// let table = config.as_table().unwrap();
/// assert_eq!(table.keys().next().map(String::as_str), Some("title"));
/// assert_eq!(table.get("offset"), Some(&Value::Integer(-1)));
/// ```
#[macro_export]
macro_rules! toml_value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml_value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Table($crate::TomlMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::TomlMap::new();
        $(
            table.insert(::std::string::String::from($key), $crate::toml_value!($value));
        )*
        $crate::Value::Table(table)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Datetime, TomlMap, Value};
    use chrono::NaiveDate;

    #[test]
    fn test_toml_value_macro_primitives() {
        assert_eq!(toml_value!(null), Value::Null);
        assert_eq!(toml_value!(true), Value::Bool(true));
        assert_eq!(toml_value!(false), Value::Bool(false));
        assert_eq!(toml_value!(42), Value::Integer(42));
        assert_eq!(toml_value!(3.5), Value::Float(3.5));
        assert_eq!(toml_value!("hello"), Value::String("hello".to_string()));
        assert_eq!(toml_value!((i64::MIN)), Value::Integer(i64::MIN));
    }

    #[test]
    fn test_toml_value_macro_arrays() {
        assert_eq!(toml_value!([]), Value::Array(vec![]));
        assert_eq!(
            toml_value!([1, [2, 3], "x",]),
            Value::Array(vec![
                Value::Integer(1),
                Value::Array(vec![Value::Integer(2), Value::Integer(3)]),
                Value::from("x"),
            ])
        );
    }

    #[test]
    fn test_toml_value_macro_tables() {
        assert_eq!(toml_value!({}), Value::Table(TomlMap::new()));

        let released = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let table = toml_value!({
            "name": "serde_tomlw",
            "released": released,
            "deps": { "serde": "1.0" },
        });

        let map = table.as_table().unwrap();
        assert_eq!(
            map.keys().map(String::as_str).collect::<Vec<_>>(),
            ["name", "released", "deps"]
        );
        assert_eq!(
            map.get("released").and_then(Value::as_datetime),
            Some(&Datetime::from(released))
        );
        assert_eq!(
            map.get("deps").and_then(Value::as_table).and_then(|d| d.get("serde")),
            Some(&Value::from("1.0"))
        );
    }
}
