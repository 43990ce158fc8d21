// vane-core - Structural equality and matching
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Equality predicates over values, ordering, and regex matching.
//!
//! Three strengths of equality are offered:
//!
//! - [`structural_equals`]: numbers compare by value across kinds, lists
//!   and vectors are interchangeable, maps and sets compare key-wise
//! - [`strict_equals`]: structural, but every pair of corresponding values
//!   must also share a type keyword (so `1` and `1.0` differ)
//! - [`identical`]: the same payload, by reference for heap data

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use regex::Regex;
use tracing::{debug, trace};
use vane_value::{Payload, Value};

use crate::error::{Error, Result};

pub fn structural_equals(a: &Value, b: &Value) -> bool {
    a == b
}

pub fn strict_equals(a: &Value, b: &Value) -> bool {
    if a.type_keyword() != b.type_keyword() {
        return false;
    }
    match (a.payload(), b.payload()) {
        (Payload::List(x), Payload::List(y)) | (Payload::Vector(x), Payload::Vector(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(x, y)| strict_equals(x, y))
        }
        (Payload::Set(x), Payload::Set(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(x, y)| strict_equals(x, y))
        }
        (Payload::Map(x), Payload::Map(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((xk, xv), (yk, yv))| {
                    strict_equals(xk, yk) && strict_equals(xv, yv)
                })
        }
        _ => a == b,
    }
}

/// Whether both values carry the same payload. Heap payloads must share
/// storage; scalars must be equal and of the same kind.
pub fn identical(a: &Value, b: &Value) -> bool {
    if a.wrapper() != b.wrapper() {
        return false;
    }
    match (a.payload(), b.payload()) {
        (Payload::String(x), Payload::String(y)) => Arc::ptr_eq(x, y),
        (Payload::List(x), Payload::List(y)) | (Payload::Vector(x), Payload::Vector(y)) => {
            x.ptr_eq(y)
        }
        (Payload::Map(x), Payload::Map(y)) => x.ptr_eq(y),
        (Payload::Set(x), Payload::Set(y)) => x.ptr_eq(y),
        (Payload::ByteBuf(x), Payload::ByteBuf(y)) => Arc::ptr_eq(x, y),
        (Payload::Number(x), Payload::Number(y)) => x.kind() == y.kind() && x.num_eq(y),
        (x, y) if x.rank() == y.rank() && (x.rank().is_identity_ranked() || is_scalar(x)) => {
            a == b
        }
        _ => false,
    }
}

fn is_scalar(payload: &Payload) -> bool {
    matches!(
        payload,
        Payload::Nil | Payload::Bool(_) | Payload::Char(_) | Payload::Keyword(_) | Payload::Symbol(_)
    )
}

/// The total order used by sorted collections.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    a.cmp(b)
}

// ============================================================================
// Regex matching
// ============================================================================

/// Compiled patterns stay cached up to this many entries.
pub const PATTERN_CACHE_LIMIT: usize = 256;

/// Anchored regexes keyed by source. Reaching the limit clears the cache
/// before the next insert, so memory stays bounded under any pattern churn.
struct PatternCache {
    patterns: DashMap<String, Regex>,
    limit: usize,
}

impl PatternCache {
    fn new(limit: usize) -> Self {
        PatternCache {
            patterns: DashMap::new(),
            limit,
        }
    }

    fn compile(&self, pattern: &str) -> Result<Regex> {
        if let Some(re) = self.patterns.get(pattern) {
            return Ok(re.clone());
        }
        trace!(pattern, "compiling pattern");
        let re = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        if self.patterns.len() >= self.limit {
            debug!(limit = self.limit, "pattern cache full, clearing");
            self.patterns.clear();
        }
        self.patterns.insert(pattern.to_string(), re.clone());
        Ok(re)
    }

    fn len(&self) -> usize {
        self.patterns.len()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    static CACHE: OnceLock<PatternCache> = OnceLock::new();
    CACHE
        .get_or_init(|| PatternCache::new(PATTERN_CACHE_LIMIT))
        .compile(pattern)
}

/// Whether the whole of string `a` matches the regex in string `b`.
pub fn matches(a: &Value, b: &Value) -> Result<bool> {
    let text = a.as_str().ok_or_else(|| Error::coercion("string", a))?;
    let pattern = b.as_str().ok_or_else(|| Error::coercion("string", b))?;
    Ok(compile(pattern)?.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_distinguishes_numeric_kinds() {
        let a = Value::vector([Value::from(1i64)]);
        let b = Value::list([Value::from(1.0f64)]);
        assert!(structural_equals(&a, &b));
        assert!(!strict_equals(&a, &b));
        assert!(strict_equals(&a, &Value::vector([Value::from(1i64)])));
    }

    #[test]
    fn test_identical_requires_shared_storage() {
        let s = Value::from("abc");
        assert!(identical(&s, &s.clone()));
        assert!(!identical(&s, &Value::from("abc")));
        assert!(identical(&Value::keyword("k"), &Value::keyword("k")));
        assert!(!identical(&Value::from(1i32), &Value::from(1i64)));
    }

    #[test]
    fn test_matches_whole_string() {
        assert!(matches(&Value::from("abc123"), &Value::from("[a-z]+\\d+")).unwrap());
        assert!(!matches(&Value::from("abc123!"), &Value::from("[a-z]+\\d+")).unwrap());
        assert!(matches(&Value::from("x"), &Value::from("x|y")).unwrap());
    }

    #[test]
    fn test_pattern_cache_stays_bounded() {
        let cache = PatternCache::new(16);
        for i in 0..100 {
            let re = cache.compile(&format!("p{i}")).unwrap();
            assert!(re.is_match(&format!("p{i}")));
            assert!(cache.len() <= 16);
        }
        assert!(cache.compile("p99").is_ok());
        assert!(cache.len() <= 16);
    }

    #[test]
    fn test_matches_errors() {
        let err = matches(&Value::from("a"), &Value::from("(")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        let err = matches(&Value::from(1i64), &Value::from("1")).unwrap_err();
        assert!(matches!(err, Error::Coercion { got: "long", .. }));
    }
}
