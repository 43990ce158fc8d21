// vane-core - Error types for the vane runtime core
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for value coercion, dispatch and arithmetic.

use std::fmt;

use thiserror::Error;
use vane_value::{SourceLocation, Value};

/// Result type for runtime core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the runtime core. None of them are retried or defaulted.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A typed accessor got a value of the wrong kind.
    #[error("Cannot coerce value of type {got} to {expected}{}", at(.location))]
    Coercion {
        expected: &'static str,
        got: &'static str,
        location: Option<SourceLocation>,
    },

    /// No arity candidate accepts the call.
    #[error("Wrong number of arguments ({got}) passed to {}: expected {expected}", .name.as_deref().unwrap_or("anonymous function"))]
    Arity {
        name: Option<String>,
        expected: AritySpec,
        got: usize,
    },

    /// A multimethod or protocol has no applicable implementation.
    #[error("No implementation of {name} for dispatch value {key}")]
    Dispatch { name: String, key: String },

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// A dispatch engine was built from invalid parts.
    #[error("Invalid construction of {what}: {message}")]
    Construction { what: &'static str, message: String },

    #[error("Precondition failed in {name}: {condition}")]
    Precondition { name: String, condition: String },

    /// A reference validator rejected a new state.
    #[error("Invalid reference state: {0}")]
    Validation(String),

    /// The interceptor refused a native call.
    #[error("Call to {name} rejected: {reason}")]
    Intercepted { name: String, reason: String },

    #[error("Invalid regex pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn at(location: &Option<SourceLocation>) -> String {
    location
        .as_ref()
        .map(|loc| format!(" at {loc}"))
        .unwrap_or_default()
}

/// Specification for expected arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
    /// Any of several candidates, as offered by a multi-arity function.
    OneOf(Vec<AritySpec>),
}

impl AritySpec {
    pub fn accepts(&self, n: usize) -> bool {
        match self {
            AritySpec::Exact(k) => n == *k,
            AritySpec::AtLeast(k) => n >= *k,
            AritySpec::Range(lo, hi) => (*lo..=*hi).contains(&n),
            AritySpec::OneOf(specs) => specs.iter().any(|s| s.accepts(n)),
        }
    }
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{n}"),
            AritySpec::AtLeast(n) => write!(f, "at least {n}"),
            AritySpec::Range(min, max) => write!(f, "{min} to {max}"),
            AritySpec::OneOf(specs) => {
                for (i, spec) in specs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{spec}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error {
    /// Coercion failure for `value`, carrying its source location if known.
    pub fn coercion(expected: &'static str, value: &Value) -> Self {
        Error::Coercion {
            expected,
            got: value.type_name(),
            location: value.source_location(),
        }
    }

    pub fn arity_named(name: impl Into<String>, expected: AritySpec, got: usize) -> Self {
        Error::Arity {
            name: Some(name.into()),
            expected,
            got,
        }
    }

    pub fn arity(expected: AritySpec, got: usize) -> Self {
        Error::Arity {
            name: None,
            expected,
            got,
        }
    }

    pub fn dispatch(name: impl Into<String>, key: &Value) -> Self {
        Error::Dispatch {
            name: name.into(),
            key: key.to_string(),
        }
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        Error::Arithmetic(message.into())
    }

    pub fn division_by_zero() -> Self {
        Error::Arithmetic("Divide by zero".to_string())
    }

    pub fn construction(what: &'static str, message: impl Into<String>) -> Self {
        Error::Construction {
            what,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_message_names_type() {
        let err = Error::coercion("number", &Value::from("abc"));
        assert_eq!(err.to_string(), "Cannot coerce value of type string to number");
    }

    #[test]
    fn test_arity_message() {
        let err = Error::arity_named(
            "greet",
            AritySpec::OneOf(vec![AritySpec::Exact(0), AritySpec::AtLeast(2)]),
            1,
        );
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments (1) passed to greet: expected 0 or at least 2"
        );
    }

    #[test]
    fn test_arity_spec_accepts() {
        assert!(AritySpec::Range(1, 3).accepts(2));
        assert!(!AritySpec::Range(1, 3).accepts(4));
        assert!(AritySpec::AtLeast(1).accepts(9));
    }
}
