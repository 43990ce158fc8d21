// vane-core - Coercion layer
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Safe narrowing from [`Value`] to a concrete kind.
//!
//! Each `as_*` accessor returns `Ok(None)` for nil, `Ok(Some(_))` when the
//! value is already of the requested kind (or is one of a few compatible
//! shapes, see below), and a [`Error::Coercion`] naming the offending type
//! otherwise. The `require_*` companions treat nil as a failure too.
//!
//! Accepted conversions:
//!
//! | Target | Also accepts |
//! |--------|--------------|
//! | list, vector, sequence | the other sequential kind; host `Vec<Value>` |
//! | map | host `HashMap<Value, Value>`, `BTreeMap<Value, Value>` |
//! | set | host `HashSet<Value>`, `BTreeSet<Value>` |

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use im::{OrdMap, OrdSet, Vector};
use vane_value::{Atom, HostObject, Keyword, Number, Payload, Symbol, Value, Volatile};

use crate::dispatch::Dispatchable;
use crate::error::{Error, Result};

pub fn as_symbol(value: &Value) -> Result<Option<Symbol>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Symbol(s) => Ok(Some(s.clone())),
        _ => Err(Error::coercion("symbol", value)),
    }
}

pub fn as_keyword(value: &Value) -> Result<Option<Keyword>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Keyword(k) => Ok(Some(k.clone())),
        _ => Err(Error::coercion("keyword", value)),
    }
}

/// The callable behind a function value.
pub fn as_fn(value: &Value) -> Result<Option<Dispatchable>> {
    if value.is_nil() {
        return Ok(None);
    }
    Dispatchable::from_value(value)
        .map(Some)
        .ok_or_else(|| Error::coercion("function", value))
}

pub fn as_string(value: &Value) -> Result<Option<Arc<str>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::String(s) => Ok(Some(Arc::clone(s))),
        _ => Err(Error::coercion("string", value)),
    }
}

pub fn as_char(value: &Value) -> Result<Option<char>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Char(c) => Ok(Some(*c)),
        _ => Err(Error::coercion("char", value)),
    }
}

pub fn as_bool(value: &Value) -> Result<Option<bool>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Bool(b) => Ok(Some(*b)),
        _ => Err(Error::coercion("boolean", value)),
    }
}

// ============================================================================
// Collections
// ============================================================================

fn host_sequence(host: &HostObject) -> Option<Vector<Value>> {
    host.downcast_ref::<Vec<Value>>()
        .map(|items| items.iter().cloned().collect())
}

/// The elements of a list, vector or host `Vec<Value>`.
pub fn as_sequence(value: &Value) -> Result<Option<Vector<Value>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::List(items) | Payload::Vector(items) => Ok(Some(items.clone())),
        Payload::Host(host) => host_sequence(host)
            .map(Some)
            .ok_or_else(|| Error::coercion("sequence", value)),
        _ => Err(Error::coercion("sequence", value)),
    }
}

/// `value` as a list. A vector keeps its metadata and becomes a list.
pub fn as_list(value: &Value) -> Result<Option<Value>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::List(_) => Ok(Some(value.clone())),
        Payload::Vector(items) => Ok(Some(rebuild(value, Payload::List(items.clone())))),
        Payload::Host(host) => host_sequence(host)
            .map(|items| Some(Value::new(Payload::List(items))))
            .ok_or_else(|| Error::coercion("list", value)),
        _ => Err(Error::coercion("list", value)),
    }
}

/// `value` as a vector. A list keeps its metadata and becomes a vector.
pub fn as_vector(value: &Value) -> Result<Option<Value>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Vector(_) => Ok(Some(value.clone())),
        Payload::List(items) => Ok(Some(rebuild(value, Payload::Vector(items.clone())))),
        Payload::Host(host) => host_sequence(host)
            .map(|items| Some(Value::new(Payload::Vector(items))))
            .ok_or_else(|| Error::coercion("vector", value)),
        _ => Err(Error::coercion("vector", value)),
    }
}

fn rebuild(original: &Value, payload: Payload) -> Value {
    let converted = Value::new(payload);
    match original.meta() {
        Some(meta) => converted.with_meta(meta.clone()),
        None => converted,
    }
}

pub fn as_map(value: &Value) -> Result<Option<OrdMap<Value, Value>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Map(m) => Ok(Some(m.clone())),
        Payload::Host(host) => {
            if let Some(m) = host.downcast_ref::<HashMap<Value, Value>>() {
                Ok(Some(m.iter().map(|(k, v)| (k.clone(), v.clone())).collect()))
            } else if let Some(m) = host.downcast_ref::<BTreeMap<Value, Value>>() {
                Ok(Some(m.iter().map(|(k, v)| (k.clone(), v.clone())).collect()))
            } else {
                Err(Error::coercion("map", value))
            }
        }
        _ => Err(Error::coercion("map", value)),
    }
}

pub fn as_set(value: &Value) -> Result<Option<OrdSet<Value>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Set(s) => Ok(Some(s.clone())),
        Payload::Host(host) => {
            if let Some(s) = host.downcast_ref::<HashSet<Value>>() {
                Ok(Some(s.iter().cloned().collect()))
            } else if let Some(s) = host.downcast_ref::<BTreeSet<Value>>() {
                Ok(Some(s.iter().cloned().collect()))
            } else {
                Err(Error::coercion("set", value))
            }
        }
        _ => Err(Error::coercion("set", value)),
    }
}

// ============================================================================
// Numbers and buffers
// ============================================================================

pub fn as_number(value: &Value) -> Result<Option<Number>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Number(n) => Ok(Some(n.clone())),
        _ => Err(Error::coercion("number", value)),
    }
}

/// An Int32 or Int64 as `i64`. Other numeric kinds are not narrowed.
pub fn as_long(value: &Value) -> Result<Option<i64>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Number(Number::Int32(n)) => Ok(Some(i64::from(*n))),
        Payload::Number(Number::Int64(n)) => Ok(Some(*n)),
        _ => Err(Error::coercion("long", value)),
    }
}

pub fn as_bytes(value: &Value) -> Result<Option<Arc<[u8]>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::ByteBuf(b) => Ok(Some(Arc::clone(b))),
        _ => Err(Error::coercion("bytebuf", value)),
    }
}

// ============================================================================
// Host objects and references
// ============================================================================

pub fn as_host(value: &Value) -> Result<Option<HostObject>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Host(h) => Ok(Some(h.clone())),
        _ => Err(Error::coercion("host-object", value)),
    }
}

pub fn as_atom(value: &Value) -> Result<Option<Arc<Atom>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Atom(a) => Ok(Some(Arc::clone(a))),
        _ => Err(Error::coercion("atom", value)),
    }
}

pub fn as_volatile(value: &Value) -> Result<Option<Arc<Volatile>>> {
    match value.payload() {
        Payload::Nil => Ok(None),
        Payload::Volatile(v) => Ok(Some(Arc::clone(v))),
        _ => Err(Error::coercion("volatile", value)),
    }
}

// ============================================================================
// Non-nil variants
// ============================================================================

macro_rules! require {
    ($($(#[$doc:meta])* $require:ident => $as:ident($target:literal) -> $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $require(value: &Value) -> Result<$ty> {
                $as(value)?.ok_or_else(|| Error::coercion($target, value))
            }
        )*
    };
}

require! {
    require_symbol => as_symbol("symbol") -> Symbol;
    require_keyword => as_keyword("keyword") -> Keyword;
    require_fn => as_fn("function") -> Dispatchable;
    require_string => as_string("string") -> Arc<str>;
    require_char => as_char("char") -> char;
    require_bool => as_bool("boolean") -> bool;
    require_sequence => as_sequence("sequence") -> Vector<Value>;
    require_list => as_list("list") -> Value;
    require_vector => as_vector("vector") -> Value;
    require_map => as_map("map") -> OrdMap<Value, Value>;
    require_set => as_set("set") -> OrdSet<Value>;
    /// The operand check used by arithmetic built-ins.
    require_number => as_number("number") -> Number;
    require_long => as_long("long") -> i64;
    require_bytes => as_bytes("bytebuf") -> Arc<[u8]>;
    require_host => as_host("host-object") -> HostObject;
    require_atom => as_atom("atom") -> Arc<Atom>;
    require_volatile => as_volatile("volatile") -> Arc<Volatile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_passes_through() {
        assert_eq!(as_number(&Value::nil()).unwrap(), None);
        assert_eq!(as_string(&Value::nil()).unwrap(), None);
        assert!(as_fn(&Value::nil()).unwrap().is_none());
        assert!(require_number(&Value::nil()).is_err());
    }

    #[test]
    fn test_error_names_offending_type() {
        let err = as_number(&Value::from("seven")).unwrap_err();
        assert_eq!(err.to_string(), "Cannot coerce value of type string to number");
        let err = require_keyword(&Value::from(1i64)).unwrap_err();
        assert!(matches!(err, Error::Coercion { got: "long", expected: "keyword", .. }));
    }

    #[test]
    fn test_list_and_vector_convert() {
        let list = Value::list([Value::from(1i64), Value::from(2i64)]);
        let vector = as_vector(&list).unwrap().unwrap();
        assert_eq!(vector.type_name(), "vector");
        assert_eq!(vector, list);
        assert_eq!(as_list(&vector).unwrap().unwrap().type_name(), "list");
        assert!(as_list(&Value::set([])).is_err());
    }

    #[test]
    fn test_host_collections_convert() {
        let seq = Value::host("rows", vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(as_sequence(&seq).unwrap().unwrap().len(), 2);

        let mut hm = HashMap::new();
        hm.insert(Value::keyword("a"), Value::from(1i64));
        let map = as_map(&Value::host("dict", hm)).unwrap().unwrap();
        assert_eq!(map.get(&Value::keyword("a")), Some(&Value::from(1i64)));

        let bs: BTreeSet<Value> = [Value::from("x")].into_iter().collect();
        assert!(as_set(&Value::host("tags", bs)).unwrap().unwrap().contains(&Value::from("x")));

        let err = as_map(&Value::host("thing", 42u8)).unwrap_err();
        assert!(err.to_string().contains("host-object"));
    }

    #[test]
    fn test_as_long_rejects_floats() {
        assert_eq!(as_long(&Value::from(3i32)).unwrap(), Some(3));
        assert!(as_long(&Value::from(3.0f64)).is_err());
    }
}
