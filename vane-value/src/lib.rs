// vane-value - Value representation for the vane runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime values for vane.
//!
//! This crate owns the data side of the runtime: the [`Value`] type and its
//! payload kinds, the numeric representations, interned identifiers, the
//! type rank and the storage cells behind atoms and volatiles. Behaviour
//! that needs to call functions (arithmetic, dispatch, reference updates)
//! lives in `vane-core`.

mod ident;
mod number;
mod rank;
mod reference;
mod value;

pub use ident::{Keyword, Symbol};
pub use number::{NumKind, Number};
pub use rank::TypeRank;
pub use reference::{Atom, Volatile, Watch};
pub use value::{FnHandle, HostObject, Meta, Payload, SourceLocation, Value};

pub use bigdecimal::BigDecimal;
pub use im;
pub use num_bigint::BigInt;
