// vane-core - Dispatch engines
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Callable values and how a call picks its concrete [`Function`].
//!
//! Every callable is a [`Dispatchable`]. Each variant resolves a call's
//! arguments to one concrete function, which is then invoked:
//!
//! - `Single`: the function itself, if it accepts the argument count
//! - `MultiArity`: exact arity first, then the longest matching variadic
//! - `Multi`: the method registered for the discriminator's result
//! - `Protocol`: the implementation registered for the first argument's type
//!
//! Resolution may nest: a multimethod's method can itself be multi-arity.

pub mod arity;
pub mod multi;
pub mod protocol;

use std::sync::Arc;

use vane_value::{FnHandle, Payload, Value};

use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::function::Function;

pub use arity::MultiArityFn;
pub use multi::MultiFn;
pub use protocol::ProtocolFn;

/// A callable value.
#[derive(Clone)]
pub enum Dispatchable {
    Single(Arc<Function>),
    MultiArity(Arc<MultiArityFn>),
    Multi(Arc<MultiFn>),
    Protocol(Arc<ProtocolFn>),
}

impl Dispatchable {
    pub fn display_name(&self) -> String {
        match self {
            Dispatchable::Single(f) => f.display_name(),
            Dispatchable::MultiArity(m) => m.display_name(),
            Dispatchable::Multi(m) => m.name().qualified_name(),
            Dispatchable::Protocol(p) => p.name().qualified_name(),
        }
    }

    /// Pick the concrete function for a call with `args`.
    pub fn resolve(&self, ctx: &CallContext, args: &[Value]) -> Result<Arc<Function>> {
        match self {
            Dispatchable::Single(f) => {
                if f.accepts(args.len()) {
                    Ok(Arc::clone(f))
                } else {
                    Err(Error::arity_named(f.display_name(), f.arity(), args.len()))
                }
            }
            Dispatchable::MultiArity(m) => m.resolve(args.len()),
            Dispatchable::Multi(m) => m.resolve(ctx, args),
            Dispatchable::Protocol(p) => p.resolve(ctx, args),
        }
    }

    /// Call with a fresh context.
    pub fn apply(&self, args: &[Value]) -> Result<Value> {
        self.apply_in(&CallContext::default(), args)
    }

    pub fn apply_in(&self, ctx: &CallContext, args: &[Value]) -> Result<Value> {
        self.resolve(ctx, args)?.invoke(ctx, args)
    }

    /// Wrap as a function value.
    pub fn into_value(self) -> Value {
        let name = self.display_name();
        Value::function(FnHandle::new(Some(&name), Arc::new(self)))
    }

    /// The callable inside a function value.
    pub fn from_value(value: &Value) -> Option<Dispatchable> {
        match value.payload() {
            Payload::Fn(handle) => handle.downcast_ref::<Dispatchable>().cloned(),
            _ => None,
        }
    }
}

impl From<Function> for Dispatchable {
    fn from(f: Function) -> Self {
        Dispatchable::Single(Arc::new(f))
    }
}

impl From<Arc<Function>> for Dispatchable {
    fn from(f: Arc<Function>) -> Self {
        Dispatchable::Single(f)
    }
}

impl From<MultiArityFn> for Dispatchable {
    fn from(m: MultiArityFn) -> Self {
        Dispatchable::MultiArity(Arc::new(m))
    }
}

impl From<MultiFn> for Dispatchable {
    fn from(m: MultiFn) -> Self {
        Dispatchable::Multi(Arc::new(m))
    }
}

impl From<ProtocolFn> for Dispatchable {
    fn from(p: ProtocolFn) -> Self {
        Dispatchable::Protocol(Arc::new(p))
    }
}

impl std::fmt::Debug for Dispatchable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Dispatchable::Single(_) => "single",
            Dispatchable::MultiArity(_) => "multi-arity",
            Dispatchable::Multi(_) => "multimethod",
            Dispatchable::Protocol(_) => "protocol",
        };
        write!(f, "#<{} {}>", kind, self.display_name())
    }
}
