// vane-core - Comparison built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparison and numeric predicates: ==, <, >, <=, >=, compare, =,
//! identical?, match?, zero?, pos?, neg?, number?
//!
//! The ordering operators follow IEEE for NaN: any comparison involving NaN
//! is false. `=` and `compare` use the total value order instead, where NaN
//! equals itself and sorts above every other number.

use std::cmp::Ordering;

use vane_value::{Number, Payload, Value};

use crate::coerce::require_number;
use crate::equality;
use crate::error::Result;
use crate::numeric;

fn numeric_chain(args: &[Value], holds: fn(Ordering) -> bool) -> Result<Value> {
    let nums: Vec<Number> = args.iter().map(require_number).collect::<Result<_>>()?;
    if nums.iter().any(Number::is_nan) {
        return Ok(Value::from(false));
    }
    Ok(Value::from(
        nums.windows(2)
            .all(|pair| holds(numeric::compare(&pair[0], &pair[1]))),
    ))
}

// ============================================================================
// Numeric comparison
// ============================================================================

/// (== x & more) - Numeric equality regardless of representation
pub(crate) fn builtin_num_eq(args: &[Value]) -> Result<Value> {
    numeric_chain(args, Ordering::is_eq)
}

pub(crate) fn builtin_lt(args: &[Value]) -> Result<Value> {
    numeric_chain(args, Ordering::is_lt)
}

pub(crate) fn builtin_gt(args: &[Value]) -> Result<Value> {
    numeric_chain(args, Ordering::is_gt)
}

pub(crate) fn builtin_le(args: &[Value]) -> Result<Value> {
    numeric_chain(args, Ordering::is_le)
}

pub(crate) fn builtin_ge(args: &[Value]) -> Result<Value> {
    numeric_chain(args, Ordering::is_ge)
}

// ============================================================================
// Value comparison
// ============================================================================

/// (compare a b) - -1, 0 or 1 under the total value order
pub(crate) fn builtin_compare(args: &[Value]) -> Result<Value> {
    let n: i64 = match equality::compare(&args[0], &args[1]) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    Ok(Value::from(n))
}

/// (= x & more) - Structural equality
pub(crate) fn builtin_eq(args: &[Value]) -> Result<Value> {
    Ok(Value::from(
        args.windows(2)
            .all(|pair| equality::structural_equals(&pair[0], &pair[1])),
    ))
}

pub(crate) fn builtin_identical_p(args: &[Value]) -> Result<Value> {
    Ok(Value::from(equality::identical(&args[0], &args[1])))
}

/// (match? s pattern) - Whether all of s matches the regex pattern
pub(crate) fn builtin_match_p(args: &[Value]) -> Result<Value> {
    equality::matches(&args[0], &args[1]).map(Value::from)
}

// ============================================================================
// Numeric predicates
// ============================================================================

pub(crate) fn builtin_zero_p(args: &[Value]) -> Result<Value> {
    Ok(Value::from(numeric::is_zero(&require_number(&args[0])?)))
}

pub(crate) fn builtin_pos_p(args: &[Value]) -> Result<Value> {
    Ok(Value::from(numeric::is_pos(&require_number(&args[0])?)))
}

pub(crate) fn builtin_neg_p(args: &[Value]) -> Result<Value> {
    Ok(Value::from(numeric::is_neg(&require_number(&args[0])?)))
}

pub(crate) fn builtin_number_p(args: &[Value]) -> Result<Value> {
    Ok(Value::from(matches!(args[0].payload(), Payload::Number(_))))
}
