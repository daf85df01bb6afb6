use chrono::{FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use serde_tomlw::{
    encode, to_file, to_string, to_string_with_options, to_value, toml_value, Datetime,
    EncodeOptions, Encoder, Error, Value,
};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

fn sample_order() -> Order {
    Order {
        order_id: 1001,
        customer: User {
            id: 1,
            name: "Bob".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "A-1".to_string(),
                price: 19.99,
                quantity: 3,
            },
            Product {
                sku: "B-2".to_string(),
                price: 0.5,
                quantity: 10,
            },
        ],
        total: 64.97,
    }
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let toml = to_string(&user).unwrap();
    assert_eq!(
        toml,
        "id = 123\nname = \"Alice\"\nactive = true\ntags = [\"admin\", \"developer\"]\n"
    );

    let back: User = toml::from_str(&toml).unwrap();
    assert_eq!(back, user);
}

#[test]
fn test_nested_struct_layout() {
    let toml = to_string(&sample_order()).unwrap();
    assert_eq!(
        toml,
        "order_id = 1001\n\
         total = 64.97\n\
         \n\
         [customer]\n\
         id = 1\n\
         name = \"Bob\"\n\
         active = true\n\
         tags = [\"vip\"]\n\
         \n\
         [[items]]\n\
         sku = \"A-1\"\n\
         price = 19.99\n\
         quantity = 3\n\
         \n\
         [[items]]\n\
         sku = \"B-2\"\n\
         price = 0.5\n\
         quantity = 10\n"
    );
}

#[test]
fn test_nested_struct_roundtrip() {
    let order = sample_order();
    let toml = to_string(&order).unwrap();
    let back: Order = toml::from_str(&toml).unwrap();
    assert_eq!(back, order);
}

#[test]
fn test_enum_fields() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Level {
        Debug,
        Info,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Output {
        File { path: String },
        Stdout,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Logging {
        level: Level,
        output: Output,
    }

    let logging = Logging {
        level: Level::Info,
        output: Output::File {
            path: "/var/log/app.log".to_string(),
        },
    };
    let toml = to_string(&logging).unwrap();
    assert_eq!(
        toml,
        "level = \"Info\"\n\n[output.File]\npath = \"/var/log/app.log\"\n"
    );
    let back: Logging = toml::from_str(&toml).unwrap();
    assert_eq!(back, logging);
    assert_ne!(back.level, Level::Debug);
    assert_ne!(back.output, Output::Stdout);
}

#[test]
fn test_hashmap_of_structs() {
    let mut users = BTreeMap::new();
    users.insert(
        "alice".to_string(),
        User {
            id: 1,
            name: "Alice".to_string(),
            active: true,
            tags: vec![],
        },
    );
    users.insert(
        "bob smith".to_string(),
        User {
            id: 2,
            name: "Bob".to_string(),
            active: false,
            tags: vec!["a".to_string()],
        },
    );

    let toml = to_string(&users).unwrap();
    assert!(toml.starts_with("[alice]\nid = 1\n"));
    assert!(toml.contains("\n\n[\"bob smith\"]\nid = 2\n"));

    let back: BTreeMap<String, User> = toml::from_str(&toml).unwrap();
    assert_eq!(back, users);
}

#[test]
fn test_option_fields() {
    #[derive(Serialize)]
    struct Settings {
        #[serde(skip_serializing_if = "Option::is_none")]
        proxy: Option<String>,
        timeout: Option<u32>,
    }

    let toml = to_string(&Settings {
        proxy: None,
        timeout: Some(30),
    })
    .unwrap();
    assert_eq!(toml, "timeout = 30\n");

    let err = to_string(&Settings {
        proxy: None,
        timeout: None,
    })
    .unwrap_err();
    match err {
        Error::UnrepresentableValue { path, .. } => assert_eq!(path.to_string(), "timeout"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_large_unsigned_is_rejected() {
    #[derive(Serialize)]
    struct Counter {
        hits: u64,
    }

    assert_eq!(to_string(&Counter { hits: 42 }).unwrap(), "hits = 42\n");

    let err = to_string(&Counter { hits: u64::MAX }).unwrap_err();
    assert!(matches!(err, Error::UnrepresentableValue { .. }));
    assert_eq!(err.path().unwrap().to_string(), "hits");
}

#[test]
fn test_to_value_preserves_order() {
    let value = to_value(&sample_order()).unwrap();
    let keys: Vec<_> = value.as_table().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["order_id", "customer", "items", "total"]);
}

#[test]
fn test_datetime_forms() {
    let tz = FixedOffset::west_opt(8 * 3600).unwrap();
    let odt = tz.with_ymd_and_hms(1979, 5, 27, 0, 32, 0).unwrap();
    let date = NaiveDate::from_ymd_opt(1979, 5, 27).unwrap();
    let ldt = date.and_hms_milli_opt(7, 32, 0, 999).unwrap();
    let lt = ldt.time();

    let doc = toml_value!({
        "odt": odt,
        "ldt": ldt,
        "ld": date,
        "lt": lt
    });
    let toml = encode(&doc).unwrap();
    assert_eq!(
        toml,
        "odt = 1979-05-27T00:32:00-08:00\n\
         ldt = 1979-05-27T07:32:00.999\n\
         ld = 1979-05-27\n\
         lt = 07:32:00.999\n"
    );

    let parsed: Value = toml::from_str(&toml).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn test_datetime_interop_with_toml_crate() {
    #[derive(Serialize, Deserialize)]
    struct Event {
        at: toml::value::Datetime,
    }

    let event = Event {
        at: "2024-01-15T10:30:00Z".parse().unwrap(),
    };
    let toml = to_string(&event).unwrap();
    assert_eq!(toml, "at = 2024-01-15T10:30:00Z\n");

    #[derive(Deserialize)]
    struct Ours {
        at: Datetime,
    }

    let ours: Ours = toml::from_str(&toml).unwrap();
    assert!(ours.at.is_offset_date_time());
    assert_eq!(ours.at.to_string(), "2024-01-15T10:30:00Z");
}

#[test]
fn test_special_strings() {
    let doc = toml_value!({
        "quote": "say \"hi\"",
        "path": "C:\\temp",
        "ctrl": "bell\u{7}",
        "unicode": "日本語"
    });
    let toml = encode(&doc).unwrap();
    assert_eq!(
        toml,
        "quote = \"say \\\"hi\\\"\"\n\
         path = \"C:\\\\temp\"\n\
         ctrl = \"bell\\u0007\"\n\
         unicode = \"日本語\"\n"
    );
    let parsed: Value = toml::from_str(&toml).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn test_multiline_and_literal_roundtrip() {
    let doc = toml_value!({
        "poem": "roses are red\r\nviolets are blue\n",
        "regex": "\\d+\\s*",
        "quoted": "it's"
    });
    let options = EncodeOptions::new()
        .with_literal_strings(true)
        .with_multiline_strings(true);
    let toml = serde_tomlw::Encoder::new()
        .with_options(options.clone())
        .encode(&doc)
        .unwrap();
    assert_eq!(
        toml,
        "poem = \"\"\"\nroses are red\\r\nviolets are blue\n\"\"\"\n\
         regex = '\\d+\\s*'\n\
         quoted = \"it's\"\n"
    );
    let parsed: Value = toml::from_str(&toml).unwrap();
    assert_eq!(parsed, doc);

    let via_serde = to_string_with_options(&doc, options).unwrap();
    assert_eq!(via_serde, toml);
}

#[test]
fn test_empty_document() {
    assert_eq!(encode(&toml_value!({})).unwrap(), "");

    #[derive(Serialize)]
    struct Nothing {}
    assert_eq!(to_string(&Nothing {}).unwrap(), "");
}

#[test]
fn test_to_file_writes_and_returns_text() {
    let temp = tempfile::tempdir().expect("failed to create temporary directory");
    let path = temp.path().join("order.toml");

    let order = sample_order();
    let text = to_file(&path, &order).unwrap();
    assert_eq!(text, to_string(&order).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);

    let back: Order = toml::from_str(&text).unwrap();
    assert_eq!(back, order);
}

#[test]
fn test_to_file_failed_encode_creates_nothing() {
    #[derive(Serialize)]
    struct Bad {
        ratio: f64,
    }

    let temp = tempfile::tempdir().expect("failed to create temporary directory");
    let path = temp.path().join("bad.toml");
    let err = to_file(&path, &Bad { ratio: f64::NAN }).unwrap_err();
    assert!(matches!(err, Error::UnrepresentableValue { .. }));
    assert!(!path.exists());
}

#[test]
fn test_to_file_missing_directory() {
    let temp = tempfile::tempdir().expect("failed to create temporary directory");
    let path = temp.path().join("missing").join("out.toml");
    let err = to_file(&path, &sample_order()).unwrap_err();
    assert!(matches!(err, Error::SinkWrite(_)));
}

#[test]
fn test_array_separator_roundtrip() {
    let doc = toml_value!({
        "ports": [8000, 8001, 8002],
        "nested": [[1, 2], ["a"]],
        "point": { "xs": [1, 2] }
    });

    for separator in [",", ",\t", ",\n    ", " , "] {
        let options = EncodeOptions::new().with_array_separator(separator);
        let toml = Encoder::new().with_options(options).encode(&doc).unwrap();
        assert!(toml.contains(&format!("[8000{}8001", separator)), "{:?}", toml);
        let parsed: Value = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, doc, "separator {:?}", separator);
    }
}
