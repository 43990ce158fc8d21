// vane-value - Core value type
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The runtime value: an immutable payload plus an optional attribute record.
//!
//! The attribute record carries metadata and the wrapper-type tag used by
//! user-defined types. It is attached beside the payload, so `with_meta` and
//! `wrap_as` produce new values that share the payload's storage.
//!
//! # Equality, ordering and hashing
//!
//! Metadata never takes part in comparison. The wrapper tag does: a value
//! wrapped as `:shape/circle` is not equal to the bare map inside it.
//!
//! Numbers compare by numeric value across representations, lists and
//! vectors compare element-wise with each other, maps and sets compare by
//! size and content. Functions, references and host objects compare by
//! identity. `Ord` is total and agrees with `Eq`, so values can key
//! persistent ordered maps.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bigdecimal::BigDecimal;
use im::{OrdMap, OrdSet, Vector};
use num_bigint::BigInt;

use crate::ident::{Keyword, Symbol};
use crate::number::Number;
use crate::rank::TypeRank;
use crate::reference::{Atom, Volatile};

/// Metadata attached to a value.
pub type Meta = OrdMap<Value, Value>;

// ============================================================================
// Opaque handles
// ============================================================================

/// A callable, type-erased so this crate need not know about dispatch.
#[derive(Clone)]
pub struct FnHandle {
    name: Option<Arc<str>>,
    target: Arc<dyn Any + Send + Sync>,
}

impl FnHandle {
    pub fn new(name: Option<&str>, target: Arc<dyn Any + Send + Sync>) -> Self {
        FnHandle {
            name: name.map(Arc::from),
            target,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.target.downcast_ref::<T>()
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.target) as *const () as usize
    }
}

/// A value owned by the embedding application.
#[derive(Clone)]
pub struct HostObject {
    type_name: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    pub fn new<T: Any + Send + Sync>(type_name: &str, payload: T) -> Self {
        HostObject {
            type_name: Arc::from(type_name),
            payload: Arc::new(payload),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.payload) as *const () as usize
    }
}

// ============================================================================
// Payload
// ============================================================================

/// The data a value carries.
#[derive(Clone)]
pub enum Payload {
    Nil,
    Bool(bool),
    Number(Number),
    Char(char),
    String(Arc<str>),
    Keyword(Keyword),
    Symbol(Symbol),
    List(Vector<Value>),
    Vector(Vector<Value>),
    Map(OrdMap<Value, Value>),
    Set(OrdSet<Value>),
    ByteBuf(Arc<[u8]>),
    Fn(FnHandle),
    Atom(Arc<Atom>),
    Volatile(Arc<Volatile>),
    Host(HostObject),
}

impl Payload {
    pub fn rank(&self) -> TypeRank {
        match self {
            Payload::Nil => TypeRank::Nil,
            Payload::Bool(_) => TypeRank::Boolean,
            Payload::Number(_) => TypeRank::Number,
            Payload::Char(_) => TypeRank::Char,
            Payload::String(_) => TypeRank::String,
            Payload::Keyword(_) => TypeRank::Keyword,
            Payload::Symbol(_) => TypeRank::Symbol,
            Payload::List(_) | Payload::Vector(_) => TypeRank::Sequential,
            Payload::Map(_) => TypeRank::Map,
            Payload::Set(_) => TypeRank::Set,
            Payload::ByteBuf(_) => TypeRank::ByteBuf,
            Payload::Fn(_) => TypeRank::Function,
            Payload::Atom(_) => TypeRank::Atom,
            Payload::Volatile(_) => TypeRank::Volatile,
            Payload::Host(_) => TypeRank::Host,
        }
    }

    /// Short label for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Nil => "nil",
            Payload::Bool(_) => "boolean",
            Payload::Number(n) => n.type_name(),
            Payload::Char(_) => "char",
            Payload::String(_) => "string",
            Payload::Keyword(_) => "keyword",
            Payload::Symbol(_) => "symbol",
            Payload::List(_) => "list",
            Payload::Vector(_) => "vector",
            Payload::Map(_) => "map",
            Payload::Set(_) => "set",
            Payload::ByteBuf(_) => "bytebuf",
            Payload::Fn(_) => "function",
            Payload::Atom(_) => "atom",
            Payload::Volatile(_) => "volatile",
            Payload::Host(_) => "host-object",
        }
    }

    fn type_keyword(&self) -> Keyword {
        match self {
            Payload::Nil => Keyword::core("nil"),
            Payload::Host(h) => Keyword::with_namespace("host", h.type_name()),
            other => Keyword::core(other.type_name()),
        }
    }
}

// ============================================================================
// Value
// ============================================================================

#[derive(Clone, Default)]
struct Attrs {
    meta: Option<Meta>,
    wrapper: Option<Keyword>,
}

/// A runtime value.
#[derive(Clone)]
pub struct Value {
    payload: Payload,
    attrs: Option<Arc<Attrs>>,
}

/// Where a value was read from, taken from `:file`/`:line`/`:column` metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: Option<i64>,
    pub column: Option<i64>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.as_deref().unwrap_or("unknown"))?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}

impl Value {
    pub fn new(payload: Payload) -> Self {
        Value {
            payload,
            attrs: None,
        }
    }

    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    pub fn nil() -> Self {
        Value::new(Payload::Nil)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::new(Payload::String(Arc::from(s.as_ref())))
    }

    /// Keyword from its printed form; the leading colon is optional.
    pub fn keyword(s: &str) -> Self {
        Value::new(Payload::Keyword(Keyword::parse(s)))
    }

    pub fn symbol(s: &str) -> Self {
        Value::new(Payload::Symbol(Symbol::parse(s)))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::new(Payload::List(items.into_iter().collect()))
    }

    pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
        Value::new(Payload::Vector(items.into_iter().collect()))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::new(Payload::Map(entries.into_iter().collect()))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::new(Payload::Set(items.into_iter().collect()))
    }

    pub fn bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Value::new(Payload::ByteBuf(data.into()))
    }

    pub fn host<T: Any + Send + Sync>(type_name: &str, payload: T) -> Self {
        Value::new(Payload::Host(HostObject::new(type_name, payload)))
    }

    pub fn atom(initial: Value) -> Self {
        Value::new(Payload::Atom(Arc::new(Atom::new(initial))))
    }

    pub fn volatile(initial: Value) -> Self {
        Value::new(Payload::Volatile(Arc::new(Volatile::new(initial))))
    }

    pub fn function(handle: FnHandle) -> Self {
        Value::new(Payload::Fn(handle))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self.payload, Payload::Nil)
    }

    /// Everything except nil and false is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self.payload, Payload::Nil | Payload::Bool(false))
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match &self.payload {
            Payload::Keyword(k) => Some(k),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Metadata and wrapper type
    // ------------------------------------------------------------------------

    pub fn meta(&self) -> Option<&Meta> {
        self.attrs.as_ref().and_then(|a| a.meta.as_ref())
    }

    /// Look up one metadata key.
    pub fn meta_get(&self, key: &Value) -> Option<&Value> {
        self.meta().and_then(|m| m.get(key))
    }

    /// A new value with the same payload and `meta` replacing any metadata.
    pub fn with_meta(&self, meta: Meta) -> Value {
        self.with_attrs(|attrs| attrs.meta = Some(meta))
    }

    pub fn without_meta(&self) -> Value {
        self.with_attrs(|attrs| attrs.meta = None)
    }

    pub fn wrapper(&self) -> Option<&Keyword> {
        self.attrs.as_ref().and_then(|a| a.wrapper.as_ref())
    }

    /// A new value reporting `tag` as its type keyword.
    pub fn wrap_as(&self, tag: Keyword) -> Value {
        self.with_attrs(|attrs| attrs.wrapper = Some(tag))
    }

    /// Drops the wrapper tag, keeping metadata.
    pub fn unwrap_type(&self) -> Value {
        self.with_attrs(|attrs| attrs.wrapper = None)
    }

    fn with_attrs(&self, update: impl FnOnce(&mut Attrs)) -> Value {
        let mut attrs = self.attrs.as_deref().cloned().unwrap_or_default();
        update(&mut attrs);
        let attrs = if attrs.meta.is_none() && attrs.wrapper.is_none() {
            None
        } else {
            Some(Arc::new(attrs))
        };
        Value {
            payload: self.payload.clone(),
            attrs,
        }
    }

    pub fn source_location(&self) -> Option<SourceLocation> {
        let meta = self.meta()?;
        let int_at = |key: &str| {
            meta.get(&Value::keyword(key))
                .and_then(Value::as_number)
                .map(Number::to_i64)
        };
        let location = SourceLocation {
            file: meta
                .get(&Value::keyword("file"))
                .and_then(Value::as_str)
                .map(str::to_string),
            line: int_at("line"),
            column: int_at("column"),
        };
        if location == SourceLocation::default() {
            None
        } else {
            Some(location)
        }
    }

    // ------------------------------------------------------------------------
    // Type identity
    // ------------------------------------------------------------------------

    #[inline]
    pub fn rank(&self) -> TypeRank {
        self.payload.rank()
    }

    pub fn type_name(&self) -> &'static str {
        self.payload.type_name()
    }

    /// The wrapper tag if present, otherwise the payload's built-in type.
    pub fn type_keyword(&self) -> Keyword {
        match self.wrapper() {
            Some(tag) => tag.clone(),
            None => self.payload.type_keyword(),
        }
    }

    /// Less specific type keywords, most specific first.
    pub fn supertypes(&self) -> Vec<Keyword> {
        let mut chain = Vec::with_capacity(4);
        if self.wrapper().is_some() {
            chain.push(self.payload.type_keyword());
        }
        match &self.payload {
            Payload::Number(_) => chain.push(Keyword::core("number")),
            Payload::List(_) | Payload::Vector(_) => {
                chain.push(Keyword::core("sequential"));
                chain.push(Keyword::core("collection"));
            }
            Payload::Map(_) | Payload::Set(_) => chain.push(Keyword::core("collection")),
            _ => {}
        }
        chain.push(Keyword::core("val"));
        chain
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl Default for Value {
    fn default() -> Self {
        Value::nil()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new(Payload::Bool(b))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::new(Payload::Char(c))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::new(Payload::Number(n))
    }
}

macro_rules! number_into_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::from(Number::from(n))
                }
            }
        )*
    };
}

number_into_value!(i32, i64, f32, f64, BigDecimal, BigInt);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(Payload::String(Arc::from(s)))
    }
}

impl From<Keyword> for Value {
    fn from(k: Keyword) -> Self {
        Value::new(Payload::Keyword(k))
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::new(Payload::Symbol(s))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Value::nil, Into::into)
    }
}

// ============================================================================
// Equality, ordering, hashing
// ============================================================================

fn identity_cmp(a: usize, b: usize) -> Ordering {
    a.cmp(&b)
}

fn cmp_payload(a: &Payload, b: &Payload) -> Ordering {
    use Payload::*;
    match (a, b) {
        (Nil, Nil) => Ordering::Equal,
        (Bool(x), Bool(y)) => x.cmp(y),
        (Number(x), Number(y)) => x.num_cmp(y),
        (Char(x), Char(y)) => x.cmp(y),
        (String(x), String(y)) => x.cmp(y),
        (Keyword(x), Keyword(y)) => x.cmp(y),
        (Symbol(x), Symbol(y)) => x.cmp(y),
        (List(x) | Vector(x), List(y) | Vector(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| x.iter().cmp(y.iter())),
        (Map(x), Map(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| x.iter().cmp(y.iter())),
        (Set(x), Set(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| x.iter().cmp(y.iter())),
        (ByteBuf(x), ByteBuf(y)) => x.cmp(y),
        (Fn(x), Fn(y)) => identity_cmp(x.addr(), y.addr()),
        (Atom(x), Atom(y)) => identity_cmp(Arc::as_ptr(x) as usize, Arc::as_ptr(y) as usize),
        (Volatile(x), Volatile(y)) => {
            identity_cmp(Arc::as_ptr(x) as usize, Arc::as_ptr(y) as usize)
        }
        (Host(x), Host(y)) => identity_cmp(x.addr(), y.addr()),
        _ => a.rank().cmp(&b.rank()),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank() && self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_payload(&self.payload, &other.payload).then_with(|| self.wrapper().cmp(&other.wrapper()))
    }
}

fn hash_payload<H: Hasher>(payload: &Payload, state: &mut H) {
    use Payload::*;
    payload.rank().hash(state);
    match payload {
        Nil => {}
        Bool(b) => b.hash(state),
        Number(n) => n.hash_numeric(state),
        Char(c) => c.hash(state),
        String(s) => s.hash(state),
        Keyword(k) => k.hash(state),
        Symbol(s) => s.hash(state),
        List(items) | Vector(items) => {
            items.len().hash(state);
            items.iter().for_each(|v| v.hash(state));
        }
        Map(entries) => {
            entries.len().hash(state);
            for (k, v) in entries.iter() {
                k.hash(state);
                v.hash(state);
            }
        }
        Set(items) => {
            items.len().hash(state);
            items.iter().for_each(|v| v.hash(state));
        }
        ByteBuf(bytes) => bytes.hash(state),
        Fn(f) => f.addr().hash(state),
        Atom(a) => (Arc::as_ptr(a) as usize).hash(state),
        Volatile(v) => (Arc::as_ptr(v) as usize).hash(state),
        Host(h) => h.addr().hash(state),
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_payload(&self.payload, state);
        self.wrapper().hash(state);
    }
}

// ============================================================================
// Display
// ============================================================================

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Nil => write!(f, "nil"),
            Payload::Bool(b) => write!(f, "{b}"),
            Payload::Number(n) => write!(f, "{n}"),
            Payload::Char(c) => match c {
                '\n' => write!(f, "\\newline"),
                ' ' => write!(f, "\\space"),
                '\t' => write!(f, "\\tab"),
                c => write!(f, "\\{c}"),
            },
            Payload::String(s) => write!(f, "{s:?}"),
            Payload::Keyword(k) => write!(f, "{k}"),
            Payload::Symbol(s) => write!(f, "{s}"),
            Payload::List(items) => write_seq(f, "(", items.iter(), ")"),
            Payload::Vector(items) => write_seq(f, "[", items.iter(), "]"),
            Payload::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
            Payload::Set(items) => write_seq(f, "#{", items.iter(), "}"),
            Payload::ByteBuf(bytes) => write!(f, "#bytebuf[{} bytes]", bytes.len()),
            Payload::Fn(h) => write!(f, "#<function {}>", h.name().unwrap_or("anonymous")),
            Payload::Atom(a) => write!(f, "#<atom {}>", a.get()),
            Payload::Volatile(v) => write!(f, "#<volatile {}>", v.get()),
            Payload::Host(h) => write!(f, "#<{}>", h.type_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
