//! Structure planning: decides which parts of a [`Node`] tree become
//! `key = value` lines, `[table]` sections or `[[array-of-tables]]`
//! elements, and renders every value written inline.
//!
//! A section (the root, a table or an array-of-tables element) is planned in
//! two passes. The first writes every entry that cannot take a header as a
//! `key = value` line; the second visits the remaining entries in their
//! original order and opens a header for each. TOML requires this order: a
//! key written after a header belongs to that header's table.
//!
//! ```rust
//! use serde_tomlw::planner::{plan_events, Event};
//! use serde_tomlw::{EncodeOptions, Node};
//!
//! let root = Node::table(vec![
//!     ("server".to_string(), Node::table(vec![("port".to_string(), Node::integer(8080))])),
//!     ("name".to_string(), Node::string("demo")),
//! ]);
//!
//! let events = plan_events(&root, &EncodeOptions::default()).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::key_value("name", "\"demo\""),
//!         Event::Table { header: "server".to_string() },
//!         Event::key_value("port", "8080"),
//!     ]
//! );
//! ```

use crate::key::{render_key, KeyPath};
use crate::scalar::{Placement, ScalarEncoder};
use crate::options::is_valid_array_separator;
use crate::{EncodeOptions, Error, Node, Result};
use std::collections::HashMap;

/// One line-level item of the output document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// `key = value`, both already rendered.
    KeyValue { key: String, value: String },
    /// `[header]`
    Table { header: String },
    /// `[[header]]`
    ArrayOfTables { header: String },
}

impl Event {
    pub fn key_value<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Event::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Receives planned events in document order.
pub trait EventSink {
    fn event(&mut self, event: Event) -> Result<()>;
}

impl EventSink for Vec<Event> {
    fn event(&mut self, event: Event) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn event(&mut self, event: Event) -> Result<()> {
        (**self).event(event)
    }
}

/// Plans `root` and streams the events into `sink`.
///
/// Events already delivered stay delivered when planning fails part way.
pub fn plan<S: EventSink + ?Sized>(
    root: &Node,
    options: &EncodeOptions,
    sink: &mut S,
) -> Result<()> {
    Planner::new(options).plan(root, sink)
}

/// Plans `root` and collects the events.
pub fn plan_events(root: &Node, options: &EncodeOptions) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    plan(root, options, &mut events)?;
    Ok(events)
}

/// Walks a [`Node`] tree depth-first, keeping the current key path.
#[derive(Debug)]
pub struct Planner<'o> {
    scalars: ScalarEncoder<'o>,
    separator: &'o str,
    path: KeyPath,
}

impl<'o> Planner<'o> {
    #[must_use]
    pub fn new(options: &'o EncodeOptions) -> Self {
        Planner {
            scalars: ScalarEncoder::new(options),
            separator: &options.array_separator,
            path: KeyPath::root(),
        }
    }

    /// Plans a whole document. The root must be a mapping.
    pub fn plan<S: EventSink + ?Sized>(&mut self, root: &Node, sink: &mut S) -> Result<()> {
        self.path = KeyPath::root();
        if !is_valid_array_separator(self.separator) {
            return Err(Error::custom(format!(
                "invalid array separator {:?}",
                self.separator
            )));
        }
        match root {
            Node::Mapping { entries, .. } => {
                tracing::debug!(entries = entries.len(), "planning document");
                self.section(entries, sink)
            }
            _ => Err(Error::unrepresentable(
                KeyPath::root(),
                "the document root must be a table",
            )),
        }
    }

    fn section<S: EventSink + ?Sized>(
        &mut self,
        entries: &[(String, Node)],
        sink: &mut S,
    ) -> Result<()> {
        check_unique(&self.path, entries)?;
        tracing::trace!(path = %self.path, entries = entries.len(), "planning section");

        for (key, node) in entries.iter().filter(|(_, node)| !node.takes_header()) {
            self.path.push_key(key);
            let value = self.value(node, Placement::Line);
            self.path.pop();
            sink.event(Event::key_value(render_key(key), value?))?;
        }

        for (key, node) in entries.iter().filter(|(_, node)| node.takes_header()) {
            self.path.push_key(key);
            let planned = self.headed(node, sink);
            self.path.pop();
            planned?;
        }
        Ok(())
    }

    /// Plans an entry that takes a header; the path already points at it.
    fn headed<S: EventSink + ?Sized>(&mut self, node: &Node, sink: &mut S) -> Result<()> {
        match node {
            Node::Mapping { entries, .. } => {
                // a non-empty table of only sub-tables is defined by their headers
                if entries.is_empty() || !entries.iter().all(|(_, child)| child.takes_header()) {
                    sink.event(Event::Table {
                        header: self.path.header(),
                    })?;
                }
                self.section(entries, sink)
            }
            Node::Sequence { items, .. } => {
                let header = self.path.header();
                for (index, item) in items.iter().enumerate() {
                    sink.event(Event::ArrayOfTables {
                        header: header.clone(),
                    })?;
                    self.path.push_index(index);
                    let planned = match item {
                        Node::Mapping { entries, .. } => self.section(entries, sink),
                        _ => Err(Error::unrepresentable(
                            self.path.clone(),
                            "array of tables element is not a table",
                        )),
                    };
                    self.path.pop();
                    planned?;
                }
                Ok(())
            }
            Node::Scalar(_) => Err(Error::unrepresentable(
                self.path.clone(),
                "a scalar cannot take a table header",
            )),
        }
    }

    /// Renders `node` as an inline value.
    fn value(&mut self, node: &Node, placement: Placement) -> Result<String> {
        match node {
            Node::Scalar(scalar) => self.scalars.encode(scalar, placement, &self.path),
            Node::Sequence { items, .. } => {
                let mut parts = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push_index(index);
                    let part = self.value(item, Placement::Inline);
                    self.path.pop();
                    parts.push(part?);
                }
                Ok(format!("[{}]", parts.join(self.separator)))
            }
            Node::Mapping { entries, .. } => {
                check_unique(&self.path, entries)?;
                if entries.is_empty() {
                    return Ok("{}".to_string());
                }
                let mut parts = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    self.path.push_key(key);
                    let part = self.value(item, Placement::Inline);
                    self.path.pop();
                    parts.push(format!("{} = {}", render_key(key), part?));
                }
                Ok(format!("{{ {} }}", parts.join(", ")))
            }
        }
    }
}

fn check_unique(path: &KeyPath, entries: &[(String, Node)]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(entries.len());
    for (key, _) in entries {
        let rendered = render_key(key).into_owned();
        if let Some(first) = seen.get(&rendered) {
            return Err(Error::DuplicateKey {
                path: path.clone(),
                first: (*first).to_string(),
                second: key.clone(),
                rendered,
            });
        }
        seen.insert(rendered, key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, node: Node) -> (String, Node) {
        (key.to_string(), node)
    }

    fn table(header: &str) -> Event {
        Event::Table {
            header: header.to_string(),
        }
    }

    fn aot(header: &str) -> Event {
        Event::ArrayOfTables {
            header: header.to_string(),
        }
    }

    fn events(root: Node) -> Vec<Event> {
        plan_events(&root, &EncodeOptions::default()).unwrap()
    }

    #[test]
    fn test_scalars_before_headers() {
        let root = Node::table(vec![
            entry("a", Node::table(vec![entry("x", Node::integer(1))])),
            entry("b", Node::integer(2)),
            entry("c", Node::table(vec![entry("y", Node::integer(3))])),
            entry("d", Node::boolean(false)),
        ]);
        assert_eq!(
            events(root),
            vec![
                Event::key_value("b", "2"),
                Event::key_value("d", "false"),
                table("a"),
                Event::key_value("x", "1"),
                table("c"),
                Event::key_value("y", "3"),
            ]
        );
    }

    #[test]
    fn test_array_of_tables() {
        let root = Node::table(vec![entry(
            "products",
            Node::sequence(vec![
                Node::table(vec![entry("name", Node::string("Hammer"))]),
                Node::table(Vec::new()),
                Node::table(vec![entry(
                    "dims",
                    Node::table(vec![entry("w", Node::integer(3))]),
                )]),
            ]),
        )]);
        assert_eq!(
            events(root),
            vec![
                aot("products"),
                Event::key_value("name", "\"Hammer\""),
                aot("products"),
                aot("products"),
                table("products.dims"),
                Event::key_value("w", "3"),
            ]
        );
    }

    #[test]
    fn test_header_omitted_for_table_of_tables() {
        let root = Node::table(vec![entry(
            "a",
            Node::table(vec![entry(
                "b",
                Node::table(vec![entry("c", Node::integer(1))]),
            )]),
        )]);
        assert_eq!(
            events(root),
            vec![table("a.b"), Event::key_value("c", "1")]
        );
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let root = Node::table(vec![entry("empty", Node::table(Vec::new()))]);
        assert_eq!(events(root), vec![table("empty")]);
    }

    #[test]
    fn test_inline_fallback() {
        let root = Node::table(vec![
            entry(
                "mixed",
                Node::sequence(vec![
                    Node::integer(1),
                    Node::table(vec![entry("a", Node::integer(2))]),
                ]),
            ),
            entry(
                "point",
                Node::inline_table(vec![
                    entry("x", Node::integer(1)),
                    entry("y", Node::inline_table(Vec::new())),
                ]),
            ),
            entry("none", Node::sequence(Vec::new())),
        ]);
        assert_eq!(
            events(root),
            vec![
                Event::key_value("mixed", "[1, { a = 2 }]"),
                Event::key_value("point", "{ x = 1, y = {} }"),
                Event::key_value("none", "[]"),
            ]
        );
    }

    #[test]
    fn test_quoted_keys_in_headers() {
        let root = Node::table(vec![entry(
            "site.example",
            Node::table(vec![entry("max conn", Node::integer(5))]),
        )]);
        assert_eq!(
            events(root),
            vec![
                table("\"site.example\""),
                Event::key_value("\"max conn\"", "5"),
            ]
        );
    }

    #[test]
    fn test_duplicate_key() {
        let root = Node::table(vec![entry(
            "owner",
            Node::table(vec![
                entry("name", Node::string("a")),
                entry("name", Node::string("b")),
            ]),
        )]);
        match plan_events(&root, &EncodeOptions::default()) {
            Err(Error::DuplicateKey { path, first, second, rendered }) => {
                assert_eq!(path.to_string(), "owner");
                assert_eq!(first, "name");
                assert_eq!(second, "name");
                assert_eq!(rendered, "name");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_key_inline() {
        let root = Node::table(vec![entry(
            "p",
            Node::inline_table(vec![
                entry("x", Node::integer(1)),
                entry("x", Node::integer(2)),
            ]),
        )]);
        let err = plan_events(&root, &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }

    #[test]
    fn test_non_finite_float_path() {
        let root = Node::table(vec![entry(
            "stats",
            Node::table(vec![entry(
                "samples",
                Node::sequence(vec![Node::float(1.0), Node::float(f64::INFINITY)]),
            )]),
        )]);
        let err = plan_events(&root, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "stats.samples[1]");

        let events = plan_events(&root, &EncodeOptions::permissive()).unwrap();
        assert_eq!(events[1], Event::key_value("samples", "[1.0, inf]"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = plan_events(&Node::integer(1), &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { .. }));
        assert!(err.path().unwrap().is_root());
    }

    #[test]
    fn test_inline_root_is_still_a_document() {
        let root = Node::inline_table(vec![entry("k", Node::string("v"))]);
        assert_eq!(events(root), vec![Event::key_value("k", "\"v\"")]);
    }

    #[test]
    fn test_custom_array_separator() {
        let root = Node::table(vec![entry(
            "grid",
            Node::sequence(vec![
                Node::sequence(vec![Node::integer(1), Node::integer(2)]),
                Node::inline_table(vec![
                    entry("a", Node::integer(1)),
                    entry("b", Node::integer(2)),
                ]),
            ]),
        )]);
        let options = EncodeOptions::new().with_array_separator(",\t");
        assert_eq!(
            plan_events(&root, &options).unwrap(),
            vec![Event::key_value("grid", "[[1,\t2],\t{ a = 1, b = 2 }]")]
        );
    }

    #[test]
    fn test_invalid_array_separator() {
        let root = Node::table(vec![entry("n", Node::integer(1))]);
        let options = EncodeOptions::new().with_array_separator("; ");
        let err = plan_events(&root, &options).unwrap_err();
        assert!(matches!(err, Error::Custom(ref msg) if msg.contains("array separator")));
    }
}
