//! The planning representation of a document.
//!
//! Encoding rules lower a [`Value`](crate::Value) into a [`Node`] tree. The
//! tree records, for every container, whether it may take a header form:
//! a mapping built with [`Node::table`] may become a `[table]` section, one
//! built with [`Node::inline_table`] is always written `{ ... }`, and a
//! sequence whose elements are all table mappings becomes an array of
//! tables.
//!
//! ```rust
//! use serde_tomlw::Node;
//!
//! let items = Node::sequence(vec![
//!     Node::table(vec![("x".to_string(), Node::integer(1))]),
//!     Node::table(vec![("x".to_string(), Node::integer(2))]),
//! ]);
//! assert!(items.is_array_of_tables());
//!
//! let mixed = Node::sequence(vec![
//!     Node::integer(1),
//!     Node::table(vec![("a".to_string(), Node::integer(2))]),
//! ]);
//! assert!(!mixed.is_array_of_tables());
//! ```

use crate::Datetime;

/// A primitive TOML value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Datetime(Datetime),
}

/// A node of the planned document.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    /// Entries keep their order. Duplicate keys are allowed here and
    /// rejected by the planner.
    Mapping {
        entries: Vec<(String, Node)>,
        table_candidate: bool,
    },
    Sequence {
        items: Vec<Node>,
        array_of_tables: bool,
    },
}

impl Node {
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Node::Scalar(Scalar::Integer(value))
    }

    #[must_use]
    pub fn float(value: f64) -> Self {
        Node::Scalar(Scalar::Float(value))
    }

    #[must_use]
    pub fn string<S: Into<String>>(value: S) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    #[must_use]
    pub fn datetime<D: Into<Datetime>>(value: D) -> Self {
        Node::Scalar(Scalar::Datetime(value.into()))
    }

    /// A mapping that may be written as a `[table]` section.
    #[must_use]
    pub fn table(entries: Vec<(String, Node)>) -> Self {
        Node::Mapping {
            entries,
            table_candidate: true,
        }
    }

    /// A mapping that is always written as an inline table.
    #[must_use]
    pub fn inline_table(entries: Vec<(String, Node)>) -> Self {
        Node::Mapping {
            entries,
            table_candidate: false,
        }
    }

    /// A sequence; it is an array of tables iff it is non-empty and every
    /// element is a table-candidate mapping.
    #[must_use]
    pub fn sequence(items: Vec<Node>) -> Self {
        let array_of_tables = !items.is_empty() && items.iter().all(Node::is_table_candidate);
        Node::Sequence {
            items,
            array_of_tables,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_table_candidate(&self) -> bool {
        matches!(
            self,
            Node::Mapping {
                table_candidate: true,
                ..
            }
        )
    }

    #[inline]
    #[must_use]
    pub fn is_array_of_tables(&self) -> bool {
        matches!(
            self,
            Node::Sequence {
                array_of_tables: true,
                ..
            }
        )
    }

    /// Whether this node gets its own header when it appears in a section.
    #[inline]
    #[must_use]
    pub fn takes_header(&self) -> bool {
        self.is_table_candidate() || self.is_array_of_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_is_not_array_of_tables() {
        assert!(!Node::sequence(Vec::new()).is_array_of_tables());
    }

    #[test]
    fn test_inline_element_blocks_array_of_tables() {
        let seq = Node::sequence(vec![
            Node::table(Vec::new()),
            Node::inline_table(Vec::new()),
        ]);
        assert!(!seq.is_array_of_tables());
        assert!(!seq.takes_header());
    }

    #[test]
    fn test_takes_header() {
        assert!(Node::table(Vec::new()).takes_header());
        assert!(!Node::inline_table(Vec::new()).takes_header());
        assert!(!Node::string("x").takes_header());
    }
}
