//! The type registry: an ordered list of encoding rules.
//!
//! Every value is lowered into a [`Node`] by the first rule that matches it.
//! Newly registered rules go to the front of the list, so the most recent
//! registration wins and callers can override built-in behaviour. Built-in
//! rules sit at the end and cover every [`ValueKind`] except extensions;
//! an extension with no matching rule fails with
//! [`Error::NoEncoderFound`].
//!
//! ## Per-call and process-wide registries
//!
//! A [`Registry`] is a plain value: clone it, mutate it, hand it to an
//! [`Encoder`](crate::Encoder). The process-wide registry used by
//! [`encode`](crate::encode) and [`to_string`](crate::to_string) lives behind
//! a lock; [`register_global`] writes to it and [`Registry::global`] returns
//! a snapshot. An encode call only ever sees the snapshot it started with.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlw::{Encoder, Node, Registry, Value};
//!
//! struct Rgb(u8, u8, u8);
//!
//! let mut registry = Registry::new();
//! registry.register::<Rgb, _>(|rgb, _cx| {
//!     Ok(Node::string(format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)))
//! });
//!
//! let mut theme = serde_tomlw::TomlMap::new();
//! theme.insert("accent".to_string(), Value::extension(Rgb(255, 128, 0)));
//!
//! let toml = Encoder::with_registry(registry).encode(&Value::Table(theme)).unwrap();
//! assert_eq!(toml, "accent = \"#ff8000\"\n");
//! ```

use crate::key::KeyPath;
use crate::{Error, Node, Result, Value, ValueKind};
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Signature of an encoding rule.
pub type EncodeFn = dyn Fn(&Value, &mut Lowering<'_>) -> Result<Node> + Send + Sync;

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Deepest nesting the lowering pass accepts.
///
/// Values built from owned data cannot be cyclic, but a rule that lowers a
/// value which maps back to itself would otherwise recurse forever.
pub const MAX_DEPTH: usize = 256;

static GLOBAL: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

#[derive(Clone)]
enum Matcher {
    Kind(ValueKind),
    Type(TypeId),
    Predicate(Arc<PredicateFn>),
}

impl Matcher {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Kind(kind) => value.kind() == *kind,
            Matcher::Type(id) => {
                matches!(value, Value::Extension(ext) if ext.payload_type_id() == *id)
            }
            Matcher::Predicate(predicate) => predicate(value),
        }
    }
}

/// One entry of a [`Registry`].
#[derive(Clone)]
pub struct Rule {
    name: Cow<'static, str>,
    matcher: Matcher,
    encode: Arc<EncodeFn>,
    builtin: bool,
}

impl Rule {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        self.matcher.matches(value)
    }

    /// Runs the rule's encoding function.
    pub fn encode(&self, value: &Value, cx: &mut Lowering<'_>) -> Result<Node> {
        (self.encode)(value, cx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("builtin", &self.builtin)
            .finish()
    }
}

fn encode_fn<F>(f: F) -> Arc<EncodeFn>
where
    F: Fn(&Value, &mut Lowering<'_>) -> Result<Node> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An ordered collection of encoding rules.
#[derive(Clone, Debug)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry holding only the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Registry {
            rules: builtin_rules(),
        }
    }

    /// Returns a snapshot of the process-wide registry.
    ///
    /// Later calls to [`register_global`] do not affect the snapshot.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers a rule for [`Value::Extension`] payloads of type `T`.
    pub fn register<T, F>(&mut self, encode: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &mut Lowering<'_>) -> Result<Node> + Send + Sync + 'static,
    {
        let wrapped = encode_fn(move |value, cx| match value.downcast_ref::<T>() {
            Some(inner) => encode(inner, cx),
            None => Err(cx.no_encoder(value)),
        });
        self.push_front(
            Cow::Borrowed(std::any::type_name::<T>()),
            Matcher::Type(TypeId::of::<T>()),
            wrapped,
        )
    }

    /// Registers a rule overriding the handling of a value kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlw::{toml_value, Encoder, Node, Registry, Value, ValueKind};
    ///
    /// // Write floats with two decimals, as strings.
    /// let mut registry = Registry::new();
    /// registry.register_kind(ValueKind::Float, |value, _cx| {
    ///     Ok(Node::string(format!("{:.2}", value.as_float().unwrap_or_default())))
    /// });
    ///
    /// let toml = Encoder::with_registry(registry)
    ///     .encode(&toml_value!({ "price": 9.5 }))
    ///     .unwrap();
    /// assert_eq!(toml, "price = \"9.50\"\n");
    /// ```
    pub fn register_kind<F>(&mut self, kind: ValueKind, encode: F) -> &mut Self
    where
        F: Fn(&Value, &mut Lowering<'_>) -> Result<Node> + Send + Sync + 'static,
    {
        self.push_front(Cow::Borrowed(kind.name()), Matcher::Kind(kind), encode_fn(encode))
    }

    /// Registers a rule matched by an arbitrary predicate.
    pub fn register_with<N, P, F>(&mut self, name: N, predicate: P, encode: F) -> &mut Self
    where
        N: Into<Cow<'static, str>>,
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        F: Fn(&Value, &mut Lowering<'_>) -> Result<Node> + Send + Sync + 'static,
    {
        self.push_front(
            name.into(),
            Matcher::Predicate(Arc::new(predicate)),
            encode_fn(encode),
        )
    }

    fn push_front(
        &mut self,
        name: Cow<'static, str>,
        matcher: Matcher,
        encode: Arc<EncodeFn>,
    ) -> &mut Self {
        tracing::debug!(rule = %name, "registering encoding rule");
        self.rules.insert(
            0,
            Rule {
                name,
                matcher,
                encode,
                builtin: false,
            },
        );
        self
    }

    /// Returns the first rule matching `value`.
    #[must_use]
    pub fn resolve(&self, value: &Value) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(value))
    }

    /// Iterates over the rules in resolution order.
    pub fn rules(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Lowers a whole value graph into a [`Node`] tree.
    pub fn lower(&self, value: &Value) -> Result<Node> {
        Lowering::new(self).lower(value)
    }
}

/// Registers a rule for extension payloads of type `T` in the process-wide
/// registry.
///
/// Encode calls already running keep using the snapshot they started with.
pub fn register_global<T, F>(encode: F)
where
    T: Any + Send + Sync,
    F: Fn(&T, &mut Lowering<'_>) -> Result<Node> + Send + Sync + 'static,
{
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register::<T, F>(encode);
}

/// Overrides the handling of a value kind in the process-wide registry.
pub fn register_global_kind<F>(kind: ValueKind, encode: F)
where
    F: Fn(&Value, &mut Lowering<'_>) -> Result<Node> + Send + Sync + 'static,
{
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_kind(kind, encode);
}

/// The state of one lowering pass: the registry in use and the path of the
/// value currently being lowered.
///
/// Rules receive a `Lowering` so they can lower child values through the
/// same registry, with the path kept up to date for diagnostics.
pub struct Lowering<'r> {
    registry: &'r Registry,
    path: KeyPath,
    depth: usize,
}

impl<'r> Lowering<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Lowering {
            registry,
            path: KeyPath::root(),
            depth: 0,
        }
    }

    /// Lowers `value` with the first matching rule.
    pub fn lower(&mut self, value: &Value) -> Result<Node> {
        if self.depth >= MAX_DEPTH {
            return Err(self.unrepresentable(format!(
                "value nests deeper than {} levels",
                MAX_DEPTH
            )));
        }
        let registry = self.registry;
        let rule = registry
            .resolve(value)
            .ok_or_else(|| self.no_encoder(value))?;
        tracing::trace!(rule = rule.name(), path = %self.path, "lowering value");

        self.depth += 1;
        let node = rule.encode(value, self);
        self.depth -= 1;
        node
    }

    /// Lowers the value stored under `key` of the current table.
    pub fn lower_entry(&mut self, key: &str, value: &Value) -> Result<Node> {
        self.path.push_key(key);
        let node = self.lower(value);
        self.path.pop();
        node
    }

    /// Lowers the element at `index` of the current array.
    pub fn lower_item(&mut self, index: usize, value: &Value) -> Result<Node> {
        self.path.push_index(index);
        let node = self.lower(value);
        self.path.pop();
        node
    }

    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// An [`Error::UnrepresentableValue`] at the current path.
    pub fn unrepresentable<R: fmt::Display>(&self, reason: R) -> Error {
        Error::unrepresentable(self.path.clone(), reason)
    }

    /// An [`Error::NoEncoderFound`] for `value` at the current path.
    pub fn no_encoder(&self, value: &Value) -> Error {
        Error::no_encoder(value.type_name(), self.path.clone())
    }
}

fn encode_builtin(value: &Value, cx: &mut Lowering<'_>) -> Result<Node> {
    match value {
        Value::Null => Err(cx.unrepresentable("TOML has no null value")),
        Value::Bool(b) => Ok(Node::boolean(*b)),
        Value::Integer(i) => Ok(Node::integer(*i)),
        Value::Float(f) => Ok(Node::float(*f)),
        Value::String(s) => Ok(Node::string(s.as_str())),
        Value::Datetime(dt) => Ok(Node::datetime(*dt)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| cx.lower_item(index, item))
            .collect::<Result<Vec<_>>>()
            .map(Node::sequence),
        Value::Table(table) => table
            .iter()
            .map(|(key, item)| Ok((key.clone(), cx.lower_entry(key, item)?)))
            .collect::<Result<Vec<_>>>()
            .map(Node::table),
        Value::Extension(_) => Err(cx.no_encoder(value)),
    }
}

fn encode_bigint(value: &Value, cx: &mut Lowering<'_>) -> Result<Node> {
    let big = value
        .downcast_ref::<BigInt>()
        .ok_or_else(|| cx.no_encoder(value))?;
    i64::try_from(big)
        .map(Node::integer)
        .map_err(|_| cx.unrepresentable(format!("integer {} does not fit in 64 bits", big)))
}

fn builtin_rules() -> Vec<Rule> {
    const KINDS: [ValueKind; 11] = [
        ValueKind::Null,
        ValueKind::Bool,
        ValueKind::Integer,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::OffsetDateTime,
        ValueKind::LocalDateTime,
        ValueKind::LocalDate,
        ValueKind::LocalTime,
        ValueKind::Table,
        ValueKind::Array,
    ];

    let builtin = encode_fn(encode_builtin);
    let mut rules: Vec<Rule> = KINDS
        .iter()
        .map(|kind| Rule {
            name: Cow::Borrowed(kind.name()),
            matcher: Matcher::Kind(*kind),
            encode: Arc::clone(&builtin),
            builtin: true,
        })
        .collect();
    rules.push(Rule {
        name: Cow::Borrowed("big integer"),
        matcher: Matcher::Type(TypeId::of::<BigInt>()),
        encode: encode_fn(encode_bigint),
        builtin: true,
    });
    rules
}
