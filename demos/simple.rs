//! Basic TOML encoding of a serde struct.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_tomlw::to_string;
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Manifest {
    name: String,
    version: String,
    authors: Vec<String>,
    dependencies: Dependencies,
    bin: Vec<Target>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Dependencies {
    serde: String,
    tracing: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Target {
    name: String,
    path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let manifest = Manifest {
        name: "demo".to_string(),
        version: "0.1.0".to_string(),
        authors: vec!["Alice Johnson".to_string()],
        dependencies: Dependencies {
            serde: "1.0".to_string(),
            tracing: "0.1".to_string(),
        },
        bin: vec![
            Target {
                name: "server".to_string(),
                path: "src/bin/server.rs".to_string(),
            },
            Target {
                name: "client".to_string(),
                path: "src/bin/client.rs".to_string(),
            },
        ],
    };

    let toml = to_string(&manifest)?;
    println!("TOML output:\n{}", toml);

    // Read it back with an independent parser
    let manifest_back: Manifest = toml::from_str(&toml)?;
    assert_eq!(manifest, manifest_back);
    println!("✓ Round-trip successful");

    Ok(())
}
