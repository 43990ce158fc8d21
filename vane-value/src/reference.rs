// vane-value - Reference cells
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Storage for the mutable reference kinds: atoms and volatiles.
//!
//! These types hold state only. Running watches, validators and update
//! functions requires the dispatch machinery in `vane-core`.
//!
//! An atom's current state is a lock-free `Arc<Value>` register. A
//! compare-and-swap succeeds only if the register still holds the very
//! `Arc` the caller loaded, so a value computed from a stale snapshot is
//! never committed. Watches and the validator sit behind ordinary locks;
//! neither is touched on the swap path.

use std::fmt;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use parking_lot::RwLock;

use crate::value::Value;

// ============================================================================
// Atom
// ============================================================================

/// A named watch: the key it was registered under and the callback value.
#[derive(Clone, Debug)]
pub struct Watch {
    pub key: Value,
    pub callback: Value,
}

/// Shared, synchronous, compare-and-swap reference.
pub struct Atom {
    state: ArcSwap<Value>,
    watches: RwLock<Vec<Watch>>,
    validator: RwLock<Option<Value>>,
}

impl Atom {
    pub fn new(initial: Value) -> Self {
        Atom {
            state: ArcSwap::from_pointee(initial),
            watches: RwLock::new(Vec::new()),
            validator: RwLock::new(None),
        }
    }

    /// The current state register.
    pub fn load(&self) -> Arc<Value> {
        self.state.load_full()
    }

    /// Current value.
    pub fn get(&self) -> Value {
        Value::clone(&self.state.load())
    }

    /// Store `new` if the register still holds `current`.
    ///
    /// Returns the replaced state on success, or the state that won the race.
    pub fn compare_exchange(
        &self,
        current: &Arc<Value>,
        new: Value,
    ) -> Result<Arc<Value>, Arc<Value>> {
        self.compare_exchange_arc(current, Arc::new(new))
    }

    /// Store `new` if the current value is structurally equal to `expected`.
    ///
    /// A concurrent swap to another equal value is retried, not reported as
    /// a mismatch.
    pub fn compare_and_set(&self, expected: &Value, new: Value) -> Option<Arc<Value>> {
        let new = Arc::new(new);
        loop {
            let current = self.state.load_full();
            if *current != *expected {
                return None;
            }
            if let Ok(prev) = self.compare_exchange_arc(&current, Arc::clone(&new)) {
                return Some(prev);
            }
        }
    }

    fn compare_exchange_arc(
        &self,
        current: &Arc<Value>,
        new: Arc<Value>,
    ) -> Result<Arc<Value>, Arc<Value>> {
        let prev = Guard::into_inner(self.state.compare_and_swap(current, new));
        if Arc::ptr_eq(&prev, current) { Ok(prev) } else { Err(prev) }
    }

    /// Unconditionally store `new`, returning the previous state.
    pub fn exchange(&self, new: Value) -> Arc<Value> {
        self.state.swap(Arc::new(new))
    }

    /// Register a watch. Re-registering a key replaces its callback in place.
    pub fn add_watch(&self, key: Value, callback: Value) {
        let mut watches = self.watches.write();
        match watches.iter_mut().find(|w| w.key == key) {
            Some(existing) => existing.callback = callback,
            None => watches.push(Watch { key, callback }),
        }
    }

    pub fn remove_watch(&self, key: &Value) -> bool {
        let mut watches = self.watches.write();
        let before = watches.len();
        watches.retain(|w| w.key != *key);
        watches.len() != before
    }

    /// Snapshot of the watches in registration order.
    pub fn watches(&self) -> Vec<Watch> {
        self.watches.read().clone()
    }

    pub fn validator(&self) -> Option<Value> {
        self.validator.read().clone()
    }

    pub fn set_validator(&self, validator: Option<Value>) {
        *self.validator.write() = validator;
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<atom {}>", self.get())
    }
}

// ============================================================================
// Volatile
// ============================================================================

/// A plain mutable box. Reads and writes are individually atomic but
/// read-modify-write sequences are not; the last writer wins.
pub struct Volatile {
    value: RwLock<Value>,
}

impl Volatile {
    pub fn new(initial: Value) -> Self {
        Volatile {
            value: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> Value {
        self.value.read().clone()
    }

    /// Store `new`, returning the previous value.
    pub fn set(&self, new: Value) -> Value {
        std::mem::replace(&mut *self.value.write(), new)
    }
}

impl fmt::Debug for Volatile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<volatile {}>", self.get())
    }
}
