// vane-core - Execution context
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The context threaded through every call.
//!
//! A [`CallContext`] is created by the embedding evaluator and passed by
//! reference down the call stack. It carries the optional interceptor that
//! is consulted before native functions run, and a binding store scoped to
//! the evaluation rather than to an OS thread.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use vane_value::{Keyword, Meta, Value};

use crate::error::Result;
use crate::function::Function;

// ============================================================================
// Interceptor
// ============================================================================

/// Hook consulted immediately before a native function body executes.
///
/// Returning an error aborts the call with that error; the body never runs.
pub trait Interceptor: Send + Sync {
    fn before_native(&self, function: &Function, args: &[Value]) -> Result<()>;
}

// ============================================================================
// Keyword-keyed local stores
// ============================================================================

/// A keyword→value binding store.
///
/// Implemented by the context-scoped [`ContextStore`] and by the OS
/// thread-local [`ThreadLocalStore`](crate::refs::ThreadLocalStore).
pub trait LocalStore {
    fn get(&self, key: &Keyword) -> Option<Value>;

    fn set(&self, key: Keyword, value: Value);

    fn remove(&self, key: &Keyword) -> Option<Value>;

    fn contains_key(&self, key: &Keyword) -> bool;

    fn clear(&self);

    /// Snapshot of every binding as keyword keys in an immutable map.
    fn to_map(&self) -> Meta;

    fn get_or(&self, key: &Keyword, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    fn assoc<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (Keyword, Value)>,
        Self: Sized,
    {
        for (key, value) in pairs {
            self.set(key, value);
        }
    }

    fn dissoc<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a Keyword>,
        Self: Sized,
    {
        for key in keys {
            self.remove(key);
        }
    }
}

/// Bindings owned by one [`CallContext`] and its clones.
#[derive(Default)]
pub struct ContextStore {
    bindings: RwLock<HashMap<Keyword, Value>>,
}

impl LocalStore for ContextStore {
    fn get(&self, key: &Keyword) -> Option<Value> {
        self.bindings.read().get(key).cloned()
    }

    fn set(&self, key: Keyword, value: Value) {
        self.bindings.write().insert(key, value);
    }

    fn remove(&self, key: &Keyword) -> Option<Value> {
        self.bindings.write().remove(key)
    }

    fn contains_key(&self, key: &Keyword) -> bool {
        self.bindings.read().contains_key(key)
    }

    fn clear(&self) {
        self.bindings.write().clear();
    }

    fn to_map(&self) -> Meta {
        self.bindings
            .read()
            .iter()
            .map(|(k, v)| (Value::from(k.clone()), v.clone()))
            .collect()
    }
}

// ============================================================================
// CallContext
// ============================================================================

/// Per-evaluation state passed by reference through dispatch.
///
/// Clones share the same binding store and interceptor.
#[derive(Clone, Default)]
pub struct CallContext {
    interceptor: Option<Arc<dyn Interceptor>>,
    locals: Arc<ContextStore>,
}

impl CallContext {
    pub fn new() -> Self {
        CallContext::default()
    }

    pub fn builder() -> CallContextBuilder {
        CallContextBuilder::default()
    }

    pub fn locals(&self) -> &ContextStore {
        &self.locals
    }

    pub fn interceptor(&self) -> Option<&Arc<dyn Interceptor>> {
        self.interceptor.as_ref()
    }

    /// Run the interceptor, if any, for a native call.
    pub(crate) fn check_native(&self, function: &Function, args: &[Value]) -> Result<()> {
        match &self.interceptor {
            Some(interceptor) => interceptor.before_native(function, args),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("intercepted", &self.interceptor.is_some())
            .field("locals", &self.locals.bindings.read().len())
            .finish()
    }
}

/// Builder for [`CallContext`].
#[derive(Default)]
pub struct CallContextBuilder {
    interceptor: Option<Arc<dyn Interceptor>>,
    bindings: Vec<(Keyword, Value)>,
}

impl CallContextBuilder {
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Initial binding in the context store.
    pub fn binding(mut self, key: Keyword, value: Value) -> Self {
        self.bindings.push((key, value));
        self
    }

    pub fn build(self) -> CallContext {
        let ctx = CallContext {
            interceptor: self.interceptor,
            locals: Arc::new(ContextStore::default()),
        };
        ctx.locals.assoc(self.bindings);
        ctx
    }
}
