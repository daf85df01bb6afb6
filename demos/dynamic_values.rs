//! Building and encoding `Value` trees at runtime.
//!
//! Run with: cargo run --example dynamic_values

use chrono::NaiveDate;
use serde::Serialize;
use serde_tomlw::{encode, to_value, toml_value, Value};
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let released = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?;

    let mut config = toml_value!({
        "host": "localhost",
        "port": 8080,
        "released": released,
        "features": ["auth", "logging", "metrics"],
        "limits": { "max_connections": 100, "timeout": 2.5 }
    });

    println!("Config as TOML:\n{}", encode(&config)?);

    // Access values dynamically
    if let Some(table) = config.as_table() {
        if let Some(host) = table.get("host").and_then(Value::as_str) {
            println!("Accessing field 'host': {}", host);
        }
        if let Some(features) = table.get("features").and_then(Value::as_array) {
            println!("Accessing field 'features': {} items\n", features.len());
        }
    }

    // Convert an existing struct to a Value and graft it in
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let user_value = to_value(&user)?;

    if let Value::Table(table) = &mut config {
        table.insert("admins".to_string(), Value::Array(vec![user_value]));
    }
    println!("With admins:\n{}", encode(&config)?);

    // Values TOML cannot hold are reported with their path
    let broken = toml_value!({ "owner": { "email": null } });
    match encode(&broken) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Expected failure: {}", e),
    }

    Ok(())
}
