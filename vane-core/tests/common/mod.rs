// vane-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for vane-core integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`int`], [`long`], [`float`], [`double`], [`decimal`], [`bigint`] -
//!   numeric values of a specific representation
//! - [`call`] - Call a built-in by name
//! - [`native`] - Build a native function as a [`Dispatchable`]
//! - [`labelled`] - A native function that returns its own name

#![allow(dead_code)]

use std::str::FromStr;

#[allow(unused_imports)]
pub use vane_core::{
    CallContext, Dispatchable, Error, Function, Keyword, MultiArityFn, MultiFn, NumKind, Number,
    Payload, ProtocolFn, Result, Symbol, Value,
};
use vane_core::vane_value::{BigDecimal, BigInt};

pub fn int(n: i32) -> Value {
    Value::from(n)
}

pub fn long(n: i64) -> Value {
    Value::from(n)
}

pub fn float(n: f32) -> Value {
    Value::from(n)
}

pub fn double(n: f64) -> Value {
    Value::from(n)
}

/// A Decimal value parsed from its string form.
pub fn decimal(s: &str) -> Value {
    Value::from(Number::decimal(BigDecimal::from_str(s).unwrap()))
}

pub fn bigint(s: &str) -> Value {
    Value::from(Number::big(BigInt::from_str(s).unwrap()))
}

/// Call the built-in bound to `name`.
pub fn call(name: &str, args: &[Value]) -> Result<Value> {
    let f = vane_core::lookup(name).unwrap_or_else(|| panic!("no builtin named {name}"));
    Dispatchable::from_value(&f).unwrap().apply(args)
}

pub fn native<F>(name: &str, fixed: usize, variadic: bool, f: F) -> Dispatchable
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
{
    Function::native(name, fixed, variadic, f).into()
}

/// A native function that ignores its arguments and returns its name.
pub fn labelled(name: &'static str, fixed: usize, variadic: bool) -> Function {
    Function::native(name, fixed, variadic, move |_| Ok(Value::from(name)))
}
