//! Teaching the encoder about your own types.
//!
//! Run with: cargo run --example custom_rules

use serde_tomlw::{
    encode, register_global, toml_value, Encoder, Node, Registry, TomlMap, Value, ValueKind,
};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

struct Endpoint {
    addr: IpAddr,
    port: u16,
    timeout: Duration,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Process-wide rules, visible to every encoder created afterwards
    register_global::<IpAddr, _>(|addr, _cx| Ok(Node::string(addr.to_string())));
    register_global::<Duration, _>(|d, _cx| Ok(Node::string(format!("{}ms", d.as_millis()))));

    // Rules may lower their own children through the context
    register_global::<Endpoint, _>(|ep, cx| {
        let addr = Value::extension(ep.addr);
        let timeout = Value::extension(ep.timeout);
        Ok(Node::table(vec![
            ("addr".to_string(), cx.lower_entry("addr", &addr)?),
            ("port".to_string(), Node::integer(i64::from(ep.port))),
            ("timeout".to_string(), cx.lower_entry("timeout", &timeout)?),
        ]))
    });

    let mut root = TomlMap::new();
    root.insert("name".to_string(), Value::from("gateway"));
    root.insert(
        "upstream".to_string(),
        Value::Array(vec![
            Value::extension(Endpoint {
                addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
                port: 8080,
                timeout: Duration::from_secs(2),
            }),
            Value::extension(Endpoint {
                addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 9090,
                timeout: Duration::from_millis(250),
            }),
        ]),
    );
    let doc = Value::Table(root);
    println!("Global rules:\n{}", encode(&doc)?);

    // An isolated registry overriding a built-in kind: booleans as yes/no
    let mut registry = Registry::global();
    registry.register_kind(ValueKind::Bool, |value, _cx| {
        Ok(Node::string(if value.as_bool() == Some(true) { "yes" } else { "no" }))
    });
    let flags = toml_value!({ "verbose": true, "color": false });
    println!("Custom booleans:\n{}", Encoder::with_registry(registry).encode(&flags)?);
    println!("Default booleans:\n{}", encode(&flags)?);

    Ok(())
}
