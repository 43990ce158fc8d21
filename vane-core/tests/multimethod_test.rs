// vane-core - Multimethod integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for multimethods.
//!
//! Tests for: keyword and function discriminators, the default method,
//! re-registration, unregister, multi-arity methods, dispatch errors

mod common;

use common::*;

fn shape(kind: &str) -> Value {
    Value::map([(Value::keyword("kind"), Value::keyword(kind))])
}

fn area() -> MultiFn {
    let m = MultiFn::new(Symbol::new("area"), &Value::keyword("kind")).unwrap();
    m.register(Value::keyword("square"), labelled("square-area", 1, false));
    m.register(Value::keyword("circle"), labelled("circle-area", 1, false));
    m
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_keyword_discriminator() {
    let m: Dispatchable = area().into();
    assert_eq!(m.apply(&[shape("square")]).unwrap(), Value::from("square-area"));
    assert_eq!(m.apply(&[shape("circle")]).unwrap(), Value::from("circle-area"));
}

#[test]
fn test_function_discriminator() {
    let by_type = native("type-of", 1, false, |args| {
        Ok(Value::from(args[0].type_keyword()))
    });
    let m = MultiFn::new(Symbol::new("describe"), &by_type.into_value()).unwrap();
    m.register(Value::keyword("core/string"), labelled("a string", 1, false));
    m.register(Value::keyword("core/long"), labelled("a long", 1, false));

    let m: Dispatchable = m.into();
    assert_eq!(m.apply(&[Value::from("s")]).unwrap(), Value::from("a string"));
    assert_eq!(m.apply(&[long(1)]).unwrap(), Value::from("a long"));
}

#[test]
fn test_missing_key_without_default_is_dispatch_error() {
    let m: Dispatchable = area().into();
    let err = m.apply(&[shape("triangle")]).unwrap_err();
    assert!(matches!(err, Error::Dispatch { .. }));
    assert_eq!(
        err.to_string(),
        "No implementation of area for dispatch value :triangle"
    );
}

#[test]
fn test_default_method() {
    let m = area();
    m.register(Value::keyword("default"), labelled("unknown", 1, false));
    let m: Dispatchable = m.into();
    assert_eq!(m.apply(&[shape("triangle")]).unwrap(), Value::from("unknown"));
    assert_eq!(m.apply(&[shape("square")]).unwrap(), Value::from("square-area"));
}

#[test]
fn test_custom_default_key() {
    let m = MultiFn::new(Symbol::new("area"), &Value::keyword("kind"))
        .unwrap()
        .with_default_key(Value::keyword("otherwise"));
    m.register(Value::keyword("otherwise"), labelled("fallback", 1, false));
    assert_eq!(m.default_key(), &Value::keyword("otherwise"));
    let m: Dispatchable = m.into();
    assert_eq!(m.apply(&[shape("x")]).unwrap(), Value::from("fallback"));
}

#[test]
fn test_numeric_keys_match_across_kinds() {
    let by_first = native("first", 1, true, |args| Ok(args[0].clone()));
    let m = MultiFn::new(Symbol::new("by-number"), &by_first.into_value()).unwrap();
    m.register(long(1), labelled("one", 1, false));
    let m: Dispatchable = m.into();
    assert_eq!(m.apply(&[int(1)]).unwrap(), Value::from("one"));
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_reregistering_replaces() {
    let m = area();
    let previous = m.register(Value::keyword("square"), labelled("new-square", 1, false));
    assert!(previous.is_some());
    let m: Dispatchable = m.into();
    assert_eq!(m.apply(&[shape("square")]).unwrap(), Value::from("new-square"));
}

#[test]
fn test_unregister() {
    let m = area();
    assert!(m.unregister(&Value::keyword("circle")).is_some());
    assert!(!m.is_registered(&Value::keyword("circle")));
    assert!(m.unregister(&Value::keyword("circle")).is_none());
    let keys: Vec<Value> = m.methods().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![Value::keyword("square")]);
}

#[test]
fn test_multi_arity_method() {
    let m = area();
    let method = MultiArityFn::from_functions(
        None,
        vec![labelled("rect-1", 1, false), labelled("rect-2", 2, false)],
    )
    .unwrap();
    m.register(Value::keyword("rect"), method);
    let m: Dispatchable = m.into();
    assert_eq!(m.apply(&[shape("rect")]).unwrap(), Value::from("rect-1"));
    assert_eq!(m.apply(&[shape("rect"), long(2)]).unwrap(), Value::from("rect-2"));
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_nil_discriminator_is_rejected() {
    let err = MultiFn::new(Symbol::new("bad"), &Value::nil()).unwrap_err();
    assert!(matches!(err, Error::Construction { .. }));
}

#[test]
fn test_non_callable_discriminator_is_rejected() {
    let err = MultiFn::new(Symbol::new("bad"), &long(3)).unwrap_err();
    assert!(err.to_string().contains("long"));
}
