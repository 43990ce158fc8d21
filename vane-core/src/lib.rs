// vane-core - Runtime core for the vane scripting language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # vane-core
//!
//! Behaviour over [`vane_value::Value`]: numeric tower arithmetic, typed
//! coercion, structural equality, functions and their dispatch engines,
//! and the atom/volatile/thread-local reference operations.
//!
//! Evaluation, parsing and namespaces live outside this crate. An evaluator
//! calls into it through [`Dispatchable::apply_in`], passing a
//! [`CallContext`] that carries the interceptor hook and context-scoped
//! bindings.

// Value has interior mutability through atoms and volatiles, but its Hash
// and Ord only look at identity for those kinds.
#![allow(clippy::mutable_key_type)]

pub mod builtins;
pub mod coerce;
pub mod context;
pub mod dispatch;
pub mod equality;
pub mod error;
pub mod function;
pub mod numeric;
pub mod refs;

pub use builtins::{builtins, lookup};
pub use context::{CallContext, CallContextBuilder, ContextStore, Interceptor, LocalStore};
pub use dispatch::{Dispatchable, MultiArityFn, MultiFn, ProtocolFn};
pub use error::{AritySpec, Error, Result};
pub use function::{Body, FnDoc, Function, Precondition, ScriptBody};
pub use refs::ThreadLocalStore;

// Re-export value types for convenience
pub use vane_value::{Keyword, NumKind, Number, Payload, Symbol, Value};
pub use vane_value;
