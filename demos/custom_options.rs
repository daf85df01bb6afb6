//! Customizing TOML output with EncodeOptions.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use serde_tomlw::{to_string, to_string_with_options, EncodeOptions};
use std::error::Error;

#[derive(Debug, Serialize)]
struct Config {
    name: String,
    install_dir: String,
    banner: String,
    max_load: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        install_dir: r"C:\Program Files\MyApp".to_string(),
        banner: "Welcome!\nHave a nice day.\n".to_string(),
        max_load: f64::INFINITY,
    };

    // Default options reject non-finite floats
    match to_string(&config) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Default (strict floats): {}\n", e),
    }

    // Permissive: writes inf / nan
    println!("Permissive floats:");
    println!("{}", to_string_with_options(&config, EncodeOptions::permissive())?);

    // Literal strings for backslash-heavy paths, multi-line strings for text
    println!("Literal and multi-line strings:");
    let options = EncodeOptions::permissive()
        .with_literal_strings(true)
        .with_multiline_strings(true);
    println!("{}", to_string_with_options(&config, options)?);

    Ok(())
}
