// vane-core - Volatile operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! vreset! and vswap!.
//!
//! A volatile is not an atom. `swap` reads, computes and writes with no
//! compare-and-swap and no retry, so concurrent writers can lose updates.
//! Volatiles are for state with a single writer.

use vane_value::{Value, Volatile};

use crate::context::CallContext;
use crate::dispatch::Dispatchable;
use crate::error::Result;

pub fn deref(volatile: &Volatile) -> Value {
    volatile.get()
}

pub fn reset(volatile: &Volatile, new: Value) -> Value {
    volatile.set(new.clone());
    new
}

/// Store `(f current extra...)`. Returns the new value.
pub fn swap(
    ctx: &CallContext,
    volatile: &Volatile,
    f: &Dispatchable,
    extra: &[Value],
) -> Result<Value> {
    swap_with(volatile, |current| {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(current.clone());
        args.extend_from_slice(extra);
        f.apply_in(ctx, &args)
    })
}

pub fn swap_with<F>(volatile: &Volatile, f: F) -> Result<Value>
where
    F: FnOnce(&Value) -> Result<Value>,
{
    let new = f(&volatile.get())?;
    volatile.set(new.clone());
    Ok(new)
}
