// vane-core - Numeric tower arithmetic
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic over the six numeric representations.
//!
//! Every binary operation promotes both operands to the join of their
//! kinds (see [`NumKind::join`]) and computes in that representation:
//!
//! - Int32/Int64: checked; overflow and division by zero are errors
//! - Float32/Float64: IEEE semantics, division by zero gives an infinity
//! - Decimal: exact; quotients that do not terminate within 16 fractional
//!   digits are rounded half up to 16 digits
//! - BigInt: exact; division truncates toward zero
//!
//! A NaN or infinite float has no Decimal form, so when one meets a Decimal
//! or BigInt the operation is carried out in Float64 instead.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{CheckedRem, Float, PrimInt, Signed, Zero};
use vane_value::{NumKind, Number};

use crate::error::{Error, Result};

/// Fractional digits kept by a non-terminating decimal quotient.
pub const DECIMAL_DIVISION_SCALE: i64 = 16;

// ============================================================================
// Promotion
// ============================================================================

/// Convert `n` to `kind` with the narrowing rules of [`Number`].
pub fn promote(n: &Number, kind: NumKind) -> Number {
    match kind {
        NumKind::Int32 => Number::Int32(n.to_i32()),
        NumKind::Int64 => Number::Int64(n.to_i64()),
        NumKind::Float32 => Number::Float32(n.to_f32()),
        NumKind::Float64 => Number::Float64(n.to_f64()),
        NumKind::Decimal => Number::decimal(n.to_decimal()),
        NumKind::BigInt => Number::big(n.to_big_integer()),
    }
}

/// The kind a binary operation on `a` and `b` computes in.
fn operating_kind(a: &Number, b: &Number) -> NumKind {
    match a.kind().join(b.kind()) {
        NumKind::Decimal if !(a.is_finite() && b.is_finite()) => NumKind::Float64,
        kind => kind,
    }
}

// ============================================================================
// Binary operations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Add => "addition",
            Op::Sub => "subtraction",
            Op::Mul => "multiplication",
            Op::Div => "division",
            Op::Rem => "remainder",
        }
    }

    fn divides(self) -> bool {
        matches!(self, Op::Div | Op::Rem)
    }

    fn overflow(self, kind: NumKind) -> Error {
        Error::arithmetic(format!("{} overflow in {} arithmetic", self.name(), kind.type_name()))
    }

    fn int<T: PrimInt + CheckedRem>(self, x: T, y: T, kind: NumKind) -> Result<T> {
        if self.divides() && y.is_zero() {
            return Err(Error::division_by_zero());
        }
        // MIN rem -1 is 0; only the quotient overflows.
        let result = match self {
            Op::Add => x.checked_add(&y),
            Op::Sub => x.checked_sub(&y),
            Op::Mul => x.checked_mul(&y),
            Op::Div => x.checked_div(&y),
            Op::Rem => Some(x.checked_rem(&y).unwrap_or_else(T::zero)),
        };
        result.ok_or_else(|| self.overflow(kind))
    }

    fn float<T: Float>(self, x: T, y: T) -> T {
        match self {
            Op::Add => x + y,
            Op::Sub => x - y,
            Op::Mul => x * y,
            Op::Div => x / y,
            Op::Rem => x % y,
        }
    }

    fn decimal(self, x: &BigDecimal, y: &BigDecimal) -> Result<BigDecimal> {
        if self.divides() && y.is_zero() {
            return Err(Error::division_by_zero());
        }
        Ok(match self {
            Op::Add => x + y,
            Op::Sub => x - y,
            Op::Mul => x * y,
            Op::Div => {
                let quotient = Number::decimal(x.clone())
                    .to_rational()
                    .zip(Number::decimal(y.clone()).to_rational())
                    .map(|(x, y)| x / y)
                    .ok_or_else(|| Error::Internal("decimal without a rational value".into()))?;
                round_to_division_scale(&quotient)
            }
            Op::Rem => decimal_rem(x, y),
        })
    }

    fn bigint(self, x: &BigInt, y: &BigInt) -> Result<BigInt> {
        if self.divides() && y.is_zero() {
            return Err(Error::division_by_zero());
        }
        Ok(match self {
            Op::Add => x + y,
            Op::Sub => x - y,
            Op::Mul => x * y,
            Op::Div => x / y,
            Op::Rem => x % y,
        })
    }

    fn apply(self, a: &Number, b: &Number) -> Result<Number> {
        let kind = operating_kind(a, b);
        let (x, y) = (promote(a, kind), promote(b, kind));
        Ok(match (&x, &y) {
            (Number::Int32(x), Number::Int32(y)) => Number::Int32(self.int(*x, *y, kind)?),
            (Number::Int64(x), Number::Int64(y)) => Number::Int64(self.int(*x, *y, kind)?),
            (Number::Float32(x), Number::Float32(y)) => Number::Float32(self.float(*x, *y)),
            (Number::Float64(x), Number::Float64(y)) => Number::Float64(self.float(*x, *y)),
            (Number::Decimal(x), Number::Decimal(y)) => Number::decimal(self.decimal(x, y)?),
            (Number::BigInt(x), Number::BigInt(y)) => Number::big(self.bigint(x, y)?),
            _ => {
                return Err(Error::Internal(format!(
                    "operands {x} and {y} did not promote to {}",
                    kind.type_name()
                )));
            }
        })
    }
}

fn ten_pow(exp: i64) -> BigInt {
    BigInt::from(10u32).pow(u32::try_from(exp).unwrap_or(u32::MAX))
}

/// An exact quotient as a decimal. Values that terminate within the
/// division scale keep their shortest form; others are rounded half up
/// (ties away from zero) to exactly [`DECIMAL_DIVISION_SCALE`] digits.
fn round_to_division_scale(q: &BigRational) -> BigDecimal {
    let scaled = q * BigRational::from_integer(ten_pow(DECIMAL_DIVISION_SCALE));
    let (numer, denom) = (scaled.numer(), scaled.denom());
    let mut digits = numer / denom;
    let remainder = numer % denom;
    let exact = remainder.is_zero();
    if !exact && remainder.abs() * 2u32 >= *denom {
        digits += if numer.is_negative() { -1 } else { 1 };
    }
    let d = BigDecimal::new(digits, DECIMAL_DIVISION_SCALE);
    if exact { trim_scale(d) } else { d }
}

/// Drops trailing fractional zeros, keeping a non-negative scale.
fn trim_scale(d: BigDecimal) -> BigDecimal {
    let trimmed = d.normalized();
    if trimmed.as_bigint_and_exponent().1 < 0 {
        trimmed.with_scale(0)
    } else {
        trimmed
    }
}

/// Remainder with the sign of the dividend, computed at the wider scale.
fn decimal_rem(x: &BigDecimal, y: &BigDecimal) -> BigDecimal {
    let scale = x.as_bigint_and_exponent().1.max(y.as_bigint_and_exponent().1);
    let (a, _) = x.with_scale(scale).into_bigint_and_exponent();
    let (b, _) = y.with_scale(scale).into_bigint_and_exponent();
    BigDecimal::new(a % b, scale)
}

pub fn add(a: &Number, b: &Number) -> Result<Number> {
    Op::Add.apply(a, b)
}

pub fn sub(a: &Number, b: &Number) -> Result<Number> {
    Op::Sub.apply(a, b)
}

pub fn mul(a: &Number, b: &Number) -> Result<Number> {
    Op::Mul.apply(a, b)
}

/// Division. Integer kinds truncate toward zero.
pub fn div(a: &Number, b: &Number) -> Result<Number> {
    Op::Div.apply(a, b)
}

/// Remainder with the sign of the dividend.
pub fn rem(a: &Number, b: &Number) -> Result<Number> {
    Op::Rem.apply(a, b)
}

// ============================================================================
// Unary operations
// ============================================================================

pub fn negate(n: &Number) -> Result<Number> {
    Ok(match n {
        Number::Int32(x) => Number::Int32(
            x.checked_neg()
                .ok_or_else(|| Op::Sub.overflow(NumKind::Int32))?,
        ),
        Number::Int64(x) => Number::Int64(
            x.checked_neg()
                .ok_or_else(|| Op::Sub.overflow(NumKind::Int64))?,
        ),
        Number::Float32(x) => Number::Float32(-x),
        Number::Float64(x) => Number::Float64(-x),
        Number::Decimal(d) => Number::decimal(-(**d).clone()),
        Number::BigInt(b) => Number::big(-(**b).clone()),
    })
}

pub fn inc(n: &Number) -> Result<Number> {
    add(n, &Number::Int32(1))
}

pub fn dec(n: &Number) -> Result<Number> {
    sub(n, &Number::Int32(1))
}

pub fn square(n: &Number) -> Result<Number> {
    mul(n, n)
}

pub fn abs(n: &Number) -> Result<Number> {
    if is_neg(n) { negate(n) } else { Ok(n.clone()) }
}

/// Square root. Integer kinds yield a double; Decimal and BigInt stay in
/// their own representation (BigInt takes the integer root).
pub fn sqrt(n: &Number) -> Result<Number> {
    match n {
        Number::Float32(x) => Ok(Number::Float32(x.sqrt())),
        Number::Int32(_) | Number::Int64(_) | Number::Float64(_) => {
            Ok(Number::Float64(n.to_f64().sqrt()))
        }
        Number::Decimal(d) => {
            if d.sign() == Sign::Minus {
                return Err(Error::arithmetic(format!("square root of negative decimal {n}")));
            }
            d.sqrt()
                .and_then(|r| Number::decimal(r).to_rational())
                .map(|r| Number::decimal(round_to_division_scale(&r)))
                .ok_or_else(|| Error::arithmetic(format!("square root of {n} is not representable")))
        }
        Number::BigInt(b) => {
            if b.is_negative() {
                return Err(Error::arithmetic(format!("square root of negative bigint {b}")));
            }
            Ok(Number::big(b.sqrt()))
        }
    }
}

// ============================================================================
// Comparison and predicates
// ============================================================================

/// Numeric equality, ignoring representation.
pub fn equ(a: &Number, b: &Number) -> bool {
    a.num_eq(b)
}

pub fn compare(a: &Number, b: &Number) -> Ordering {
    a.num_cmp(b)
}

fn signum(n: &Number) -> Option<Ordering> {
    match n {
        Number::Int32(x) => Some(x.cmp(&0)),
        Number::Int64(x) => Some(x.cmp(&0)),
        Number::Float32(x) => x.partial_cmp(&0.0),
        Number::Float64(x) => x.partial_cmp(&0.0),
        Number::Decimal(d) => Some(d.sign().cmp(&Sign::NoSign)),
        Number::BigInt(b) => Some(b.sign().cmp(&Sign::NoSign)),
    }
}

pub fn is_zero(n: &Number) -> bool {
    signum(n) == Some(Ordering::Equal)
}

pub fn is_pos(n: &Number) -> bool {
    signum(n) == Some(Ordering::Greater)
}

pub fn is_neg(n: &Number) -> bool {
    signum(n) == Some(Ordering::Less)
}

pub fn min<'a>(a: &'a Number, b: &'a Number) -> &'a Number {
    if compare(b, a) == Ordering::Less { b } else { a }
}

pub fn max<'a>(a: &'a Number, b: &'a Number) -> &'a Number {
    if compare(b, a) == Ordering::Greater { b } else { a }
}
