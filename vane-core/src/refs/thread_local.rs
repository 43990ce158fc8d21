// vane-core - Thread-local binding store
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A keyword→value map private to each OS thread.
//!
//! [`ThreadLocalStore`] is a zero-sized handle; every operation acts on the
//! calling thread's own map, created on first use and dropped with the
//! thread. Prefer the context-scoped store on
//! [`CallContext`](crate::context::CallContext) unless the binding must
//! follow the OS thread.

use std::cell::RefCell;
use std::collections::HashMap;

use vane_value::{Keyword, Meta, Value};

use crate::context::LocalStore;

thread_local! {
    static BINDINGS: RefCell<HashMap<Keyword, Value>> = RefCell::new(HashMap::new());
}

/// Handle to the calling thread's bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalStore;

impl LocalStore for ThreadLocalStore {
    fn get(&self, key: &Keyword) -> Option<Value> {
        BINDINGS.with_borrow(|b| b.get(key).cloned())
    }

    fn set(&self, key: Keyword, value: Value) {
        BINDINGS.with_borrow_mut(|b| {
            b.insert(key, value);
        });
    }

    fn remove(&self, key: &Keyword) -> Option<Value> {
        BINDINGS.with_borrow_mut(|b| b.remove(key))
    }

    fn contains_key(&self, key: &Keyword) -> bool {
        BINDINGS.with_borrow(|b| b.contains_key(key))
    }

    /// Empties this thread's bindings only.
    fn clear(&self) {
        BINDINGS.with_borrow_mut(HashMap::clear);
    }

    fn to_map(&self) -> Meta {
        BINDINGS.with_borrow(|b| {
            b.iter()
                .map(|(k, v)| (Value::from(k.clone()), v.clone()))
                .collect()
        })
    }
}
