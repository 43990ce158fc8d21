// vane-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic operations: +, -, *, /, rem, inc, dec, negate, square, sqrt,
//! abs, min, max
//!
//! ## Integer Overflow Behaviour
//!
//! Integer arithmetic is checked. An Int32 or Int64 result that does not
//! fit its representation is an error rather than a silent promotion to
//! BigInt. Float operations do not check for overflow.

use vane_value::{Number, Value};

use crate::coerce::require_number;
use crate::error::Result;
use crate::numeric;

// ============================================================================
// Helpers
// ============================================================================

fn numbers(args: &[Value]) -> Result<Vec<Number>> {
    args.iter().map(require_number).collect()
}

fn fold(
    init: Number,
    rest: &[Number],
    op: fn(&Number, &Number) -> Result<Number>,
) -> Result<Value> {
    rest.iter()
        .try_fold(init, |acc, n| op(&acc, n))
        .map(Value::from)
}

/// Folds from the first operand so a lone argument keeps its kind.
fn variadic(
    args: &[Value],
    identity: i64,
    op: fn(&Number, &Number) -> Result<Number>,
) -> Result<Value> {
    match numbers(args)?.split_first() {
        Some((x, rest)) => fold(x.clone(), rest, op),
        None => Ok(Value::from(identity)),
    }
}

fn unary(args: &[Value], op: fn(&Number) -> Result<Number>) -> Result<Value> {
    op(&require_number(&args[0])?).map(Value::from)
}

// ============================================================================
// Variadic operators
// ============================================================================

/// (+ & xs) - Sum, 0 with no arguments
pub(crate) fn builtin_add(args: &[Value]) -> Result<Value> {
    variadic(args, 0, numeric::add)
}

/// (* & xs) - Product, 1 with no arguments
pub(crate) fn builtin_mul(args: &[Value]) -> Result<Value> {
    variadic(args, 1, numeric::mul)
}

/// (- x & ys) - Negation with one argument, otherwise x minus each y
pub(crate) fn builtin_sub(args: &[Value]) -> Result<Value> {
    let nums = numbers(args)?;
    match nums.split_first() {
        Some((x, [])) => numeric::negate(x).map(Value::from),
        Some((x, rest)) => fold(x.clone(), rest, numeric::sub),
        None => Ok(Value::from(0i64)),
    }
}

/// (/ x & ys) - Reciprocal with one argument, otherwise x divided by each y
pub(crate) fn builtin_div(args: &[Value]) -> Result<Value> {
    let nums = numbers(args)?;
    match nums.split_first() {
        Some((x, [])) => {
            numeric::div(&numeric::promote(&Number::Int32(1), x.kind()), x).map(Value::from)
        }
        Some((x, rest)) => fold(x.clone(), rest, numeric::div),
        None => Ok(Value::from(1i64)),
    }
}

pub(crate) fn builtin_min(args: &[Value]) -> Result<Value> {
    let nums = numbers(args)?;
    Ok(nums
        .iter()
        .reduce(|a, b| numeric::min(a, b))
        .cloned()
        .map(Value::from)
        .unwrap_or_default())
}

pub(crate) fn builtin_max(args: &[Value]) -> Result<Value> {
    let nums = numbers(args)?;
    Ok(nums
        .iter()
        .reduce(|a, b| numeric::max(a, b))
        .cloned()
        .map(Value::from)
        .unwrap_or_default())
}

// ============================================================================
// Fixed arity
// ============================================================================

/// (rem num div) - Remainder, sign of num
pub(crate) fn builtin_rem(args: &[Value]) -> Result<Value> {
    numeric::rem(&require_number(&args[0])?, &require_number(&args[1])?).map(Value::from)
}

pub(crate) fn builtin_inc(args: &[Value]) -> Result<Value> {
    unary(args, numeric::inc)
}

pub(crate) fn builtin_dec(args: &[Value]) -> Result<Value> {
    unary(args, numeric::dec)
}

pub(crate) fn builtin_negate(args: &[Value]) -> Result<Value> {
    unary(args, numeric::negate)
}

pub(crate) fn builtin_square(args: &[Value]) -> Result<Value> {
    unary(args, numeric::square)
}

pub(crate) fn builtin_sqrt(args: &[Value]) -> Result<Value> {
    unary(args, numeric::sqrt)
}

pub(crate) fn builtin_abs(args: &[Value]) -> Result<Value> {
    unary(args, numeric::abs)
}
