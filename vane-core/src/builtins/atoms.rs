// vane-core - Atom and volatile built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Reference operations: atom, deref, reset!, reset-vals!, swap!,
//! swap-vals!, compare-and-set!, add-watch, remove-watch, set-validator!,
//! volatile, vreset!, vswap!

use vane_value::{Payload, Value};

use crate::coerce::{as_fn, require_atom, require_fn, require_volatile};
use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::refs::{atom, volatile};

// ============================================================================
// Creation and deref
// ============================================================================

/// (atom x) - Create an atom with initial value x
pub(crate) fn builtin_atom(args: &[Value]) -> Result<Value> {
    Ok(Value::atom(args[0].clone()))
}

/// (volatile x) - Create a volatile with initial value x
pub(crate) fn builtin_volatile(args: &[Value]) -> Result<Value> {
    Ok(Value::volatile(args[0].clone()))
}

/// (deref ref) - Current value of an atom or volatile
pub(crate) fn builtin_deref(args: &[Value]) -> Result<Value> {
    match args[0].payload() {
        Payload::Atom(a) => Ok(atom::deref(a)),
        Payload::Volatile(v) => Ok(volatile::deref(v)),
        _ => Err(Error::coercion("atom", &args[0])),
    }
}

// ============================================================================
// Atom transitions
// ============================================================================

/// (reset! atom newval) - Set atom value, returns newval
pub(crate) fn builtin_reset(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    atom::reset(ctx, &require_atom(&args[0])?, args[1].clone())
}

/// (reset-vals! atom newval) - Set atom value, returns [old new]
pub(crate) fn builtin_reset_vals(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    let (old, new) = atom::reset_vals(ctx, &require_atom(&args[0])?, args[1].clone())?;
    Ok(Value::vector([old, new]))
}

/// (swap! atom f & args) - Atomically set to (apply f current args)
pub(crate) fn builtin_swap(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    let a = require_atom(&args[0])?;
    atom::swap(ctx, &a, &require_fn(&args[1])?, &args[2..])
}

/// (swap-vals! atom f & args) - Like swap!, returns [old new]
pub(crate) fn builtin_swap_vals(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    let a = require_atom(&args[0])?;
    let (old, new) = atom::swap_vals(ctx, &a, &require_fn(&args[1])?, &args[2..])?;
    Ok(Value::vector([old, new]))
}

/// (compare-and-set! atom oldval newval) - CAS, returns true if successful
pub(crate) fn builtin_compare_and_set(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    let a = require_atom(&args[0])?;
    atom::compare_and_set(ctx, &a, &args[1], args[2].clone()).map(Value::from)
}

// ============================================================================
// Watches and validators
// ============================================================================

/// (add-watch atom key f) - f is called with (atom old new); returns atom
pub(crate) fn builtin_add_watch(args: &[Value]) -> Result<Value> {
    atom::add_watch(&*require_atom(&args[0])?, args[1].clone(), args[2].clone())?;
    Ok(args[0].clone())
}

/// (remove-watch atom key) - Returns atom
pub(crate) fn builtin_remove_watch(args: &[Value]) -> Result<Value> {
    atom::remove_watch(&*require_atom(&args[0])?, &args[1]);
    Ok(args[0].clone())
}

/// (set-validator! atom f) - Install f as validator, nil removes it
pub(crate) fn builtin_set_validator(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    let a = require_atom(&args[0])?;
    as_fn(&args[1])?;
    let validator = (!args[1].is_nil()).then(|| args[1].clone());
    atom::set_validator(ctx, &a, validator)?;
    Ok(Value::nil())
}

// ============================================================================
// Volatiles
// ============================================================================

/// (vreset! vol newval) - Set volatile value, returns newval
pub(crate) fn builtin_vreset(args: &[Value]) -> Result<Value> {
    Ok(volatile::reset(&*require_volatile(&args[0])?, args[1].clone()))
}

/// (vswap! vol f & args) - Set to (apply f current args), not atomic
pub(crate) fn builtin_vswap(ctx: &CallContext, args: &[Value]) -> Result<Value> {
    let v = require_volatile(&args[0])?;
    volatile::swap(ctx, &v, &require_fn(&args[1])?, &args[2..])
}
