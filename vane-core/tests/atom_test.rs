// vane-core - Atom integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for atoms and volatiles.
//!
//! Tests for: swap! under contention, reset!, compare-and-set!, watches,
//! validators, volatiles

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use common::*;
use vane_core::coerce::require_atom;
use vane_core::refs::{atom, volatile};
use vane_core::vane_value::{Atom, Volatile};

fn plus_one(v: &Value) -> Result<Value> {
    vane_core::numeric::inc(v.as_number().unwrap_or(&Number::Int64(0))).map(Value::from)
}

/// A watch that records every (old, new) pair it is called with.
fn recording_watch() -> (Value, Arc<Mutex<Vec<(Value, Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let watch = native("watch", 3, false, move |args| {
        log.lock().unwrap().push((args[1].clone(), args[2].clone()));
        Ok(Value::nil())
    });
    (watch.into_value(), seen)
}

// =============================================================================
// Contention
// =============================================================================

#[test]
fn test_concurrent_swaps_lose_no_updates() {
    let a = Arc::new(Atom::new(long(0)));
    let handles: Vec<_> = (0..100)
        .map(|_| {
            let a = Arc::clone(&a);
            thread::spawn(move || {
                let ctx = CallContext::new();
                for _ in 0..1000 {
                    atom::swap_with(&ctx, &a, plus_one).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(atom::deref(&a), long(100_000));
}

#[test]
fn test_concurrent_builtin_swaps() {
    let a = call("atom", &[long(0)]).unwrap();
    let inc = vane_core::lookup("inc").unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let a = a.clone();
            let inc = inc.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    call("swap!", &[a.clone(), inc.clone()]).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(call("deref", &[a]).unwrap(), long(2000));
}

#[test]
fn test_each_commit_notifies_once() {
    let a = Arc::new(Atom::new(long(0)));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let watch = native("count", 3, false, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Value::nil())
    });
    atom::add_watch(&a, Value::keyword("count"), watch.into_value()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let a = Arc::clone(&a);
            thread::spawn(move || {
                let ctx = CallContext::new();
                for _ in 0..100 {
                    atom::swap_with(&ctx, &a, plus_one).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 400);
}

// =============================================================================
// Watches
// =============================================================================

#[test]
fn test_reset_notifies_watch_once() {
    let a = Arc::new(Atom::new(long(1)));
    let (watch, seen) = recording_watch();
    atom::add_watch(&a, Value::keyword("w"), watch).unwrap();

    atom::reset(&CallContext::new(), &a, long(2)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![(long(1), long(2))]);
}

#[test]
fn test_removed_watch_is_not_called() {
    let a = Arc::new(Atom::new(long(1)));
    let (watch, seen) = recording_watch();
    atom::add_watch(&a, Value::keyword("w"), watch).unwrap();
    assert!(atom::remove_watch(&a, &Value::keyword("w")));

    atom::reset(&CallContext::new(), &a, long(2)).unwrap();
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_watch_receives_the_atom() {
    let a = call("atom", &[long(1)]).unwrap();
    let target = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&target);
    let watch = native("grab", 3, false, move |args| {
        *slot.lock().unwrap() = Some(args[0].clone());
        Ok(Value::nil())
    });
    call("add-watch", &[a.clone(), Value::keyword("w"), watch.into_value()]).unwrap();
    call("reset!", &[a.clone(), long(5)]).unwrap();

    let got = target.lock().unwrap().clone().unwrap();
    assert!(vane_core::equality::identical(&got, &a));
}

#[test]
fn test_watches_fire_in_registration_order() {
    let a = Arc::new(Atom::new(long(0)));
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        let watch = native(name, 3, false, move |_| {
            order.lock().unwrap().push(name);
            Ok(Value::nil())
        });
        atom::add_watch(&a, Value::keyword(name), watch.into_value()).unwrap();
    }
    atom::reset(&CallContext::new(), &a, long(1)).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn test_readding_a_watch_replaces_it() {
    let a = Arc::new(Atom::new(long(0)));
    let (first, first_seen) = recording_watch();
    let (second, second_seen) = recording_watch();
    atom::add_watch(&a, Value::keyword("w"), first).unwrap();
    atom::add_watch(&a, Value::keyword("w"), second).unwrap();
    atom::reset(&CallContext::new(), &a, long(1)).unwrap();
    assert!(first_seen.lock().unwrap().is_empty());
    assert_eq!(second_seen.lock().unwrap().len(), 1);
}

// =============================================================================
// Compare-and-set and validators
// =============================================================================

#[test]
fn test_compare_and_set_is_structural() {
    let ctx = CallContext::new();
    let a = Arc::new(Atom::new(Value::vector([long(1), long(2)])));
    assert!(!atom::compare_and_set(&ctx, &a, &Value::vector([long(1)]), long(0)).unwrap());
    assert!(atom::compare_and_set(&ctx, &a, &Value::list([int(1), int(2)]), long(3)).unwrap());
    assert_eq!(atom::deref(&a), long(3));
}

#[test]
fn test_validator_rejects_and_keeps_state() {
    let a = call("atom", &[long(1)]).unwrap();
    let pos = vane_core::lookup("pos?").unwrap();
    call("set-validator!", &[a.clone(), pos]).unwrap();

    let err = call("reset!", &[a.clone(), long(-1)]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(call("deref", &[a.clone()]).unwrap(), long(1));

    call("set-validator!", &[a.clone(), Value::nil()]).unwrap();
    assert_eq!(call("reset!", &[a.clone(), long(-1)]).unwrap(), long(-1));
    assert!(require_atom(&a).unwrap().validator().is_none());
}

#[test]
fn test_reset_vals_and_swap_vals() {
    let a = call("atom", &[long(1)]).unwrap();
    let r = call("reset-vals!", &[a.clone(), long(5)]).unwrap();
    assert_eq!(r, Value::vector([long(1), long(5)]));
    let plus = vane_core::lookup("+").unwrap();
    let r = call("swap-vals!", &[a, plus, long(10)]).unwrap();
    assert_eq!(r, Value::vector([long(5), long(15)]));
}

// =============================================================================
// Volatiles
// =============================================================================

#[test]
fn test_volatile_last_write_wins() {
    let v = Volatile::new(long(0));
    volatile::reset(&v, long(1));
    volatile::reset(&v, long(2));
    assert_eq!(volatile::deref(&v), long(2));
    let r = volatile::swap_with(&v, plus_one).unwrap();
    assert_eq!(r, long(3));
}

#[test]
fn test_volatile_builtins() {
    let v = call("volatile", &[long(1)]).unwrap();
    assert_eq!(call("vreset!", &[v.clone(), long(10)]).unwrap(), long(10));
    let plus = vane_core::lookup("+").unwrap();
    assert_eq!(call("vswap!", &[v.clone(), plus, long(5)]).unwrap(), long(15));
    assert_eq!(call("deref", &[v]).unwrap(), long(15));
}
