// vane-core - Multi-arity function integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for arity dispatch.
//!
//! Tests for: exact and variadic resolution, construction errors, arity
//! error messages, determinism across threads

mod common;

use std::sync::Arc;
use std::thread;

use common::*;

fn two_and_variadic() -> MultiArityFn {
    MultiArityFn::from_functions(
        Some(Symbol::new("f")),
        vec![labelled("two", 2, false), labelled("one-plus", 1, true)],
    )
    .unwrap()
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_exact_arity_beats_variadic() {
    let f = two_and_variadic();
    assert_eq!(f.resolve(2).unwrap().display_name(), "two");
}

#[test]
fn test_variadic_covers_other_counts() {
    let f = two_and_variadic();
    assert_eq!(f.resolve(1).unwrap().display_name(), "one-plus");
    assert_eq!(f.resolve(5).unwrap().display_name(), "one-plus");
}

#[test]
fn test_apply_through_dispatchable() {
    let f: Dispatchable = two_and_variadic().into();
    let r = f.apply(&[long(1), long(2)]).unwrap();
    assert_eq!(r, Value::from("two"));
    let r = f.apply(&[long(1), long(2), long(3)]).unwrap();
    assert_eq!(r, Value::from("one-plus"));
}

#[test]
fn test_no_candidate_is_an_arity_error() {
    let f = two_and_variadic();
    let err = f.resolve(0).unwrap_err();
    assert!(matches!(err, Error::Arity { got: 0, .. }));
    assert_eq!(
        err.to_string(),
        "Wrong number of arguments (0) passed to f: expected 2 or at least 1"
    );
}

#[test]
fn test_fixed_only_arities() {
    let f = MultiArityFn::from_functions(
        None,
        vec![labelled("zero", 0, false), labelled("three", 3, false)],
    )
    .unwrap();
    assert_eq!(f.resolve(0).unwrap().display_name(), "zero");
    assert_eq!(f.resolve(3).unwrap().display_name(), "three");
    let err = f.resolve(1).unwrap_err();
    assert!(err.to_string().contains("anonymous function"));
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_empty_set_is_rejected() {
    let err = MultiArityFn::from_functions(Some(Symbol::new("g")), Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Construction { .. }));
}

#[test]
fn test_duplicate_arity_is_rejected() {
    let err = MultiArityFn::from_functions(
        Some(Symbol::new("g")),
        vec![labelled("a", 2, false), labelled("b", 2, false)],
    )
    .unwrap_err();
    assert!(err.to_string().contains("arity 2"));
}

#[test]
fn test_bodies_lists_every_overload() {
    let f = two_and_variadic();
    let names: Vec<String> = f.bodies().iter().map(|b| b.display_name()).collect();
    assert_eq!(names, vec!["two".to_string(), "one-plus".to_string()]);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_resolution_is_deterministic_across_threads() {
    let f = Arc::new(two_and_variadic());
    let expected2 = f.resolve(2).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let f = Arc::clone(&f);
            thread::spawn(move || (f.resolve(2).unwrap(), f.resolve(5).unwrap()))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (two, five) in &results {
        assert!(Arc::ptr_eq(two, &expected2));
        assert!(Arc::ptr_eq(five, &results[0].1));
        assert_eq!(five.display_name(), "one-plus");
    }
}
