// vane-value - Numeric representations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The six numeric representations and the lattice that orders them.
//!
//! ```text
//! Int32 < Int64 < Float32 < Float64 < { Decimal, BigInt }
//! ```
//!
//! Decimal joined with BigInt is Decimal, as is any float joined with a
//! BigInt. Decimal is arbitrary precision, so every finite number has a
//! Decimal form. Arithmetic lives in `vane-core`; this module owns
//! representation, narrowing, exact comparison and hashing.
//!
//! Comparison is exact. Finite values of different kinds are compared as
//! rationals so that the order stays transitive (no precision is lost the
//! way it would be by promoting a 64-bit integer to a double). Non-finite
//! floats order as `-inf < finite < +inf < NaN`, and NaN equals itself.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

// ============================================================================
// Kinds and the promotion lattice
// ============================================================================

/// The representation tag of a [`Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumKind {
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    BigInt,
}

impl NumKind {
    /// Position in the lattice. Decimal and BigInt share the top level.
    pub fn width(self) -> u8 {
        match self {
            NumKind::Int32 => 0,
            NumKind::Int64 => 1,
            NumKind::Float32 => 2,
            NumKind::Float64 => 3,
            NumKind::Decimal | NumKind::BigInt => 4,
        }
    }

    /// The representation both operands are promoted to.
    pub fn join(self, other: NumKind) -> NumKind {
        use NumKind::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Decimal, _) | (_, Decimal) => Decimal,
            (BigInt, Float32 | Float64) | (Float32 | Float64, BigInt) => Decimal,
            (BigInt, _) | (_, BigInt) => BigInt,
            (a, b) if a.width() >= b.width() => a,
            (_, b) => b,
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, NumKind::Int32 | NumKind::Int64 | NumKind::BigInt)
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumKind::Float32 | NumKind::Float64)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            NumKind::Int32 => "integer",
            NumKind::Int64 => "long",
            NumKind::Float32 => "float",
            NumKind::Float64 => "double",
            NumKind::Decimal => "decimal",
            NumKind::BigInt => "bigint",
        }
    }
}

// ============================================================================
// Number
// ============================================================================

/// A numeric value in one of six representations.
#[derive(Debug, Clone)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Arc<BigDecimal>),
    BigInt(Arc<BigInt>),
}

/// Where a value sits relative to the finite numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Extent {
    NegInfinite,
    Finite,
    PosInfinite,
    NaN,
}

impl Number {
    pub fn big(n: BigInt) -> Self {
        Number::BigInt(Arc::new(n))
    }

    pub fn decimal(d: BigDecimal) -> Self {
        Number::Decimal(Arc::new(d))
    }

    pub fn kind(&self) -> NumKind {
        match self {
            Number::Int32(_) => NumKind::Int32,
            Number::Int64(_) => NumKind::Int64,
            Number::Float32(_) => NumKind::Float32,
            Number::Float64(_) => NumKind::Float64,
            Number::Decimal(_) => NumKind::Decimal,
            Number::BigInt(_) => NumKind::BigInt,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    fn extent(&self) -> Extent {
        let f = match self {
            Number::Float32(f) => *f as f64,
            Number::Float64(f) => *f,
            _ => return Extent::Finite,
        };
        if f.is_nan() {
            Extent::NaN
        } else if f == f64::INFINITY {
            Extent::PosInfinite
        } else if f == f64::NEG_INFINITY {
            Extent::NegInfinite
        } else {
            Extent::Finite
        }
    }

    pub fn is_nan(&self) -> bool {
        self.extent() == Extent::NaN
    }

    // ------------------------------------------------------------------------
    // Narrowing. None of these panic.
    // ------------------------------------------------------------------------

    pub fn to_i32(&self) -> i32 {
        match self {
            Number::Int32(n) => *n,
            Number::Float32(f) => *f as i32,
            Number::Float64(f) => *f as i32,
            _ => self.to_i64() as i32,
        }
    }

    pub fn to_i64(&self) -> i64 {
        match self {
            Number::Int32(n) => i64::from(*n),
            Number::Int64(n) => *n,
            Number::Float32(f) => *f as i64,
            Number::Float64(f) => *f as i64,
            Number::Decimal(d) => bigint_low_i64(&decimal_trunc(d)),
            Number::BigInt(b) => bigint_low_i64(b),
        }
    }

    pub fn to_f32(&self) -> f32 {
        match self {
            Number::Float32(f) => *f,
            _ => self.to_f64() as f32,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int32(n) => f64::from(*n),
            Number::Int64(n) => *n as f64,
            Number::Float32(f) => f64::from(*f),
            Number::Float64(f) => *f,
            Number::Decimal(d) => d.to_f64().unwrap_or(0.0),
            Number::BigInt(b) => b.to_f64().unwrap_or(if b.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
        }
    }

    /// Truncates toward zero. NaN and infinities become zero.
    pub fn to_big_integer(&self) -> BigInt {
        match self {
            Number::Int32(n) => BigInt::from(*n),
            Number::Int64(n) => BigInt::from(*n),
            Number::Float32(f) => BigInt::from_f32(f.trunc()).unwrap_or_default(),
            Number::Float64(f) => BigInt::from_f64(f.trunc()).unwrap_or_default(),
            Number::Decimal(d) => decimal_trunc(d),
            Number::BigInt(b) => (**b).clone(),
        }
    }

    /// Exact for every finite value. NaN and infinities become zero.
    pub fn to_decimal(&self) -> BigDecimal {
        self.try_decimal().unwrap_or_else(BigDecimal::zero)
    }

    /// Promotes to Decimal, or `None` for NaN and infinities.
    ///
    /// Floats convert through their shortest round-trip form, so `0.1`
    /// becomes `0.1M` rather than its full binary expansion.
    pub fn try_decimal(&self) -> Option<BigDecimal> {
        match self {
            Number::Int32(n) => Some(BigDecimal::from(*n)),
            Number::Int64(n) => Some(BigDecimal::from(*n)),
            Number::Float32(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).ok(),
            Number::Float64(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).ok(),
            Number::Float32(_) | Number::Float64(_) => None,
            Number::Decimal(d) => Some((**d).clone()),
            Number::BigInt(b) => Some(BigDecimal::new((**b).clone(), 0)),
        }
    }

    /// Whether this is a NaN or infinite float.
    pub fn is_finite(&self) -> bool {
        self.extent() == Extent::Finite
    }

    /// The exact rational value, or `None` for NaN and infinities.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Number::Int32(n) => Some(BigRational::from_integer(BigInt::from(*n))),
            Number::Int64(n) => Some(BigRational::from_integer(BigInt::from(*n))),
            Number::Float32(f) => BigRational::from_float(*f),
            Number::Float64(f) => BigRational::from_float(*f),
            Number::Decimal(d) => Some(decimal_to_rational(d)),
            Number::BigInt(b) => Some(BigRational::from_integer((**b).clone())),
        }
    }

    // ------------------------------------------------------------------------
    // Comparison and hashing
    // ------------------------------------------------------------------------

    /// Total numeric order across all representations.
    pub fn num_cmp(&self, other: &Number) -> Ordering {
        use Number::*;
        match (self, other) {
            (Int32(a), Int32(b)) => a.cmp(b),
            (Int32(_) | Int64(_), Int32(_) | Int64(_)) => self.to_i64().cmp(&other.to_i64()),
            (Decimal(a), Decimal(b)) => a.cmp(b),
            (BigInt(a), BigInt(b)) => a.cmp(b),
            (Float32(_) | Float64(_), Float32(_) | Float64(_)) => {
                let (a, b) = (self.to_f64(), other.to_f64());
                match a.partial_cmp(&b) {
                    Some(ord) => ord,
                    None => self.extent().cmp(&other.extent()),
                }
            }
            _ => self.exact_cmp(other),
        }
    }

    fn exact_cmp(&self, other: &Number) -> Ordering {
        let (ea, eb) = (self.extent(), other.extent());
        if ea != Extent::Finite || eb != Extent::Finite {
            return ea.cmp(&eb);
        }
        match (self.to_rational(), other.to_rational()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => ea.cmp(&eb),
        }
    }

    /// Numeric equality regardless of representation.
    pub fn num_eq(&self, other: &Number) -> bool {
        self.num_cmp(other) == Ordering::Equal
    }

    /// Feeds a hash that agrees with [`Number::num_eq`].
    ///
    /// Integral values within `i64` hash as that `i64`; other integers hash
    /// as big integers; fractions hash as reduced rationals.
    pub fn hash_numeric<H: Hasher>(&self, state: &mut H) {
        const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
        match self {
            Number::Int32(n) => hash_i64(i64::from(*n), state),
            Number::Int64(n) => hash_i64(*n, state),
            Number::Float64(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < I64_BOUND => {
                hash_i64(*f as i64, state)
            }
            Number::Decimal(d) if d.is_integer() => match d.to_i64() {
                Some(n) => hash_i64(n, state),
                None => self.hash_rational(state),
            },
            _ => self.hash_rational(state),
        }
    }

    fn hash_rational<H: Hasher>(&self, state: &mut H) {
        let Some(r) = self.to_rational() else {
            3u8.hash(state);
            (self.extent() as u8).hash(state);
            return;
        };
        if r.is_integer() {
            let i = r.to_integer();
            match i.to_i64() {
                Some(n) => hash_i64(n, state),
                None => {
                    1u8.hash(state);
                    i.hash(state);
                }
            }
        } else {
            2u8.hash(state);
            r.hash(state);
        }
    }
}

fn hash_i64<H: Hasher>(n: i64, state: &mut H) {
    0u8.hash(state);
    n.hash(state);
}

/// `10^exp` for a decimal scale.
fn ten_pow(exp: u64) -> BigInt {
    BigInt::from(10u32).pow(u32::try_from(exp).unwrap_or(u32::MAX))
}

fn decimal_trunc(d: &BigDecimal) -> BigInt {
    let (digits, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        digits * ten_pow(scale.unsigned_abs())
    } else {
        digits / ten_pow(scale.unsigned_abs())
    }
}

fn decimal_to_rational(d: &BigDecimal) -> BigRational {
    let (digits, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        BigRational::from_integer(digits * ten_pow(scale.unsigned_abs()))
    } else {
        BigRational::new(digits, ten_pow(scale.unsigned_abs()))
    }
}

/// Low 64 bits in two's complement, matching a wrapping cast.
fn bigint_low_i64(b: &BigInt) -> i64 {
    let bytes = b.to_signed_bytes_le();
    let mut buf = if b.is_negative() { [0xff; 8] } else { [0; 8] };
    for (slot, byte) in buf.iter_mut().zip(bytes.iter()) {
        *slot = *byte;
    }
    i64::from_le_bytes(buf)
}

// ============================================================================
// Conversions and display
// ============================================================================

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int32(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int64(n)
    }
}

impl From<f32> for Number {
    fn from(f: f32) -> Self {
        Number::Float32(f)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float64(f)
    }
}

impl From<BigDecimal> for Number {
    fn from(d: BigDecimal) -> Self {
        Number::decimal(d)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::big(n)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.num_eq(other)
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.num_cmp(other)
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_numeric(state);
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        write!(f, "NaN")
    } else if x.is_infinite() {
        write!(f, "{}Infinity", if x < 0.0 { "-" } else { "" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int32(n) => write!(f, "{n}I"),
            Number::Int64(n) => write!(f, "{n}"),
            Number::Float32(x) => {
                write_float(f, f64::from(*x))?;
                write!(f, "F")
            }
            Number::Float64(x) => write_float(f, *x),
            Number::Decimal(d) => write!(f, "{}M", d.to_plain_string()),
            Number::BigInt(b) => write!(f, "{b}N"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn dec(s: &str) -> Number {
        Number::decimal(BigDecimal::from_str(s).unwrap())
    }

    fn hash_of(n: &Number) -> u64 {
        let mut h = DefaultHasher::new();
        n.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_join_follows_lattice() {
        assert_eq!(NumKind::Int32.join(NumKind::Float64), NumKind::Float64);
        assert_eq!(NumKind::Int64.join(NumKind::Float32), NumKind::Float32);
        assert_eq!(NumKind::Decimal.join(NumKind::BigInt), NumKind::Decimal);
        assert_eq!(NumKind::Int64.join(NumKind::BigInt), NumKind::BigInt);
        assert_eq!(NumKind::Float64.join(NumKind::BigInt), NumKind::Decimal);
        assert_eq!(NumKind::Float64.join(NumKind::Decimal), NumKind::Decimal);
    }

    #[test]
    fn test_cross_kind_equality() {
        let five = Number::Int32(5);
        assert_eq!(five, Number::Int64(5));
        assert_eq!(five, Number::Float64(5.0));
        assert_eq!(five, dec("5.00"));
        assert_eq!(five, Number::big(BigInt::from(5)));
        assert_ne!(five, Number::Float64(5.5));
    }

    #[test]
    fn test_equal_numbers_hash_equal() {
        let values = [
            Number::Int32(5),
            Number::Int64(5),
            Number::Float32(5.0),
            Number::Float64(5.0),
            dec("5.00"),
            Number::big(BigInt::from(5)),
        ];
        let expected = hash_of(&values[0]);
        for v in &values {
            assert_eq!(hash_of(v), expected, "hash mismatch for {v}");
        }
        assert_eq!(
            hash_of(&Number::Float64(0.5)),
            hash_of(&dec("0.5"))
        );
    }

    #[test]
    fn test_large_long_vs_double_is_exact() {
        let big = Number::Int64(i64::MAX);
        let approx = Number::Float64(i64::MAX as f64);
        assert_eq!(big.num_cmp(&approx), Ordering::Less);
    }

    #[test]
    fn test_non_finite_ordering() {
        let nan = Number::Float64(f64::NAN);
        let inf = Number::Float64(f64::INFINITY);
        let ninf = Number::Float32(f32::NEG_INFINITY);
        let big = Number::big(BigInt::from(10).pow(40));
        assert!(ninf < big);
        assert!(big < inf);
        assert!(inf < nan);
        assert_eq!(nan, Number::Float32(f32::NAN));
    }

    #[test]
    fn test_narrowing_never_panics() {
        let huge = Number::big(BigInt::from(1u64 << 40) * BigInt::from(1u64 << 40) + 7);
        assert_eq!(huge.to_i64(), 7);
        assert_eq!(Number::Float64(f64::NAN).to_i64(), 0);
        assert_eq!(Number::Float64(1e300).to_i32(), i32::MAX);
        assert_eq!(Number::Float64(f64::NAN).to_decimal(), BigDecimal::zero());
        assert_eq!(dec("-3.79").to_i64(), -3);
        assert_eq!(dec("-3.79").to_big_integer(), BigInt::from(-3));
        assert_eq!(Number::Float64(-2.9).to_big_integer(), BigInt::from(-2));
        assert_eq!(Number::Int64(i64::from(i32::MAX) + 1).to_i32(), i32::MIN);
    }

    #[test]
    fn test_decimal_is_unbounded() {
        let huge = Number::big(BigInt::from(10).pow(30));
        assert_eq!(huge.to_decimal(), BigDecimal::new(BigInt::from(10).pow(30), 0));
        assert_eq!(
            Number::Float64(1e300).to_decimal(),
            BigDecimal::new(BigInt::from(10).pow(300), 0)
        );
        assert_eq!(Number::Float64(0.1).to_decimal(), BigDecimal::from_str("0.1").unwrap());
        assert!(Number::Float64(f64::INFINITY).try_decimal().is_none());
        assert_eq!(dec("1e40").to_big_integer(), BigInt::from(10).pow(40));
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Int32(5).to_string(), "5I");
        assert_eq!(Number::Int64(5).to_string(), "5");
        assert_eq!(Number::Float64(2.0).to_string(), "2.0");
        assert_eq!(Number::Float32(1.5).to_string(), "1.5F");
        assert_eq!(dec("1.50").to_string(), "1.50M");
        assert_eq!(Number::big(BigInt::from(7)).to_string(), "7N");
    }
}
