// vane-core - Atom operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Atom operations: deref, reset!, swap!, compare-and-set!, watches, validators.
//!
//! `swap` runs its update function outside any lock and commits the result
//! with a compare-and-swap against the exact state it read. On contention
//! the whole update is retried, so the update function may run more than
//! once and must not have side effects.
//!
//! Every successful transition (including an unconditional `reset`) calls
//! each watch once, synchronously, in registration order, with
//! `(atom, old, new)`. A validator, when set, sees each candidate state
//! before it is committed.

use std::sync::Arc;

use tracing::trace;
use vane_value::{Atom, Payload, Value};

use crate::context::CallContext;
use crate::dispatch::Dispatchable;
use crate::error::{Error, Result};

pub fn deref(atom: &Atom) -> Value {
    atom.get()
}

/// Set the value unconditionally. Returns the new value.
pub fn reset(ctx: &CallContext, atom: &Arc<Atom>, new: Value) -> Result<Value> {
    reset_vals(ctx, atom, new).map(|(_, new)| new)
}

/// Like [`reset`], returning `(old, new)`.
pub fn reset_vals(ctx: &CallContext, atom: &Arc<Atom>, new: Value) -> Result<(Value, Value)> {
    validate(ctx, atom, &new)?;
    let old = atom.exchange(new.clone());
    notify_watches(ctx, atom, &old, &new)?;
    Ok(((*old).clone(), new))
}

/// Apply `(f current extra...)` until it commits. Returns the new value.
pub fn swap(ctx: &CallContext, atom: &Arc<Atom>, f: &Dispatchable, extra: &[Value]) -> Result<Value> {
    swap_vals(ctx, atom, f, extra).map(|(_, new)| new)
}

/// Like [`swap`], returning `(old, new)` for the committed transition.
pub fn swap_vals(
    ctx: &CallContext,
    atom: &Arc<Atom>,
    f: &Dispatchable,
    extra: &[Value],
) -> Result<(Value, Value)> {
    update(ctx, atom, |current| {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(current.clone());
        args.extend_from_slice(extra);
        f.apply_in(ctx, &args)
    })
}

/// [`swap`] with a Rust closure as the update function.
pub fn swap_with<F>(ctx: &CallContext, atom: &Arc<Atom>, f: F) -> Result<Value>
where
    F: Fn(&Value) -> Result<Value>,
{
    update(ctx, atom, f).map(|(_, new)| new)
}

fn update<F>(ctx: &CallContext, atom: &Arc<Atom>, f: F) -> Result<(Value, Value)>
where
    F: Fn(&Value) -> Result<Value>,
{
    loop {
        let current = atom.load();
        let new = f(current.as_ref())?;
        validate(ctx, atom, &new)?;
        match atom.compare_exchange(&current, new.clone()) {
            Ok(old) => {
                notify_watches(ctx, atom, &old, &new)?;
                return Ok(((*old).clone(), new));
            }
            Err(_) => trace!("atom changed during swap, retrying"),
        }
    }
}

/// Set to `new` only if the current value equals `expected`.
pub fn compare_and_set(
    ctx: &CallContext,
    atom: &Arc<Atom>,
    expected: &Value,
    new: Value,
) -> Result<bool> {
    validate(ctx, atom, &new)?;
    match atom.compare_and_set(expected, new.clone()) {
        Some(old) => {
            notify_watches(ctx, atom, &old, &new)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

// ============================================================================
// Watches and validators
// ============================================================================

fn callable(value: &Value) -> Result<Dispatchable> {
    Dispatchable::from_value(value).ok_or_else(|| Error::coercion("function", value))
}

/// Register `callback` under `key`, replacing any watch with the same key.
pub fn add_watch(atom: &Atom, key: Value, callback: Value) -> Result<()> {
    callable(&callback)?;
    atom.add_watch(key, callback);
    Ok(())
}

pub fn remove_watch(atom: &Atom, key: &Value) -> bool {
    atom.remove_watch(key)
}

/// Install or clear the validator. The current state must pass a new one.
pub fn set_validator(ctx: &CallContext, atom: &Atom, validator: Option<Value>) -> Result<()> {
    if let Some(v) = &validator {
        check(ctx, &callable(v)?, &atom.get())?;
    }
    atom.set_validator(validator);
    Ok(())
}

fn validate(ctx: &CallContext, atom: &Atom, candidate: &Value) -> Result<()> {
    match atom.validator() {
        Some(v) => check(ctx, &callable(&v)?, candidate),
        None => Ok(()),
    }
}

fn check(ctx: &CallContext, validator: &Dispatchable, candidate: &Value) -> Result<()> {
    if validator
        .apply_in(ctx, std::slice::from_ref(candidate))?
        .is_truthy()
    {
        Ok(())
    } else {
        Err(Error::Validation(format!("validator rejected {candidate}")))
    }
}

fn notify_watches(ctx: &CallContext, atom: &Arc<Atom>, old: &Value, new: &Value) -> Result<()> {
    let watches = atom.watches();
    if watches.is_empty() {
        return Ok(());
    }
    let this = Value::new(Payload::Atom(Arc::clone(atom)));
    for watch in watches {
        trace!(watch = %watch.key, "notifying atom watch");
        callable(&watch.callback)?.apply_in(ctx, &[this.clone(), old.clone(), new.clone()])?;
    }
    Ok(())
}
