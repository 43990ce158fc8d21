// vane-core - Arity dispatch
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Functions with several arities, e.g. `(fn ([x] ...) ([x y & more] ...))`.
//!
//! Fixed-arity bodies live in a table indexed by argument count. Variadic
//! bodies are kept in registration order. A call with `n` arguments picks
//! the fixed body for `n` if there is one, otherwise the variadic body with
//! the longest fixed prefix not exceeding `n`.
//!
//! Resolutions are memoised per argument count. Two threads racing on the
//! same count compute the same answer, so either write may win.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;
use vane_value::Symbol;

use crate::error::{AritySpec, Error, Result};
use crate::function::Function;

pub struct MultiArityFn {
    name: Option<Symbol>,
    fixed: Vec<Option<Arc<Function>>>,
    variadic: Vec<Arc<Function>>,
    cache: DashMap<usize, Arc<Function>>,
}

impl MultiArityFn {
    /// Build from one or more bodies.
    ///
    /// Rejects an empty set, two bodies with the same fixed arity, and two
    /// variadic bodies with the same fixed prefix.
    pub fn new<I>(name: Option<Symbol>, bodies: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<Function>>,
    {
        let label = name
            .as_ref()
            .map_or_else(|| "anonymous function".to_string(), Symbol::qualified_name);
        let mut fixed: Vec<Option<Arc<Function>>> = Vec::new();
        let mut variadic: Vec<Arc<Function>> = Vec::new();

        for body in bodies {
            let n = body.fixed_args();
            if body.is_variadic() {
                if variadic.iter().any(|v| v.fixed_args() == n) {
                    return Err(Error::construction(
                        "multi-arity function",
                        format!("{label} has two variadic overloads taking at least {n} arguments"),
                    ));
                }
                variadic.push(body);
            } else {
                if fixed.len() <= n {
                    let table_len = n
                        .checked_add(1)
                        .filter(|len| fixed.try_reserve(len - fixed.len()).is_ok())
                        .ok_or_else(|| {
                            Error::construction(
                                "multi-arity function",
                                format!("{label} has an overload with unsupported arity {n}"),
                            )
                        })?;
                    fixed.resize(table_len, None);
                }
                if fixed[n].is_some() {
                    return Err(Error::construction(
                        "multi-arity function",
                        format!("{label} has two overloads with arity {n}"),
                    ));
                }
                fixed[n] = Some(body);
            }
        }

        if variadic.is_empty() && fixed.iter().all(Option::is_none) {
            return Err(Error::construction(
                "multi-arity function",
                format!("{label} needs at least one body"),
            ));
        }

        Ok(MultiArityFn {
            name,
            fixed,
            variadic,
            cache: DashMap::new(),
        })
    }

    /// Convenience for building from owned functions.
    pub fn from_functions(name: Option<Symbol>, bodies: Vec<Function>) -> Result<Self> {
        MultiArityFn::new(name, bodies.into_iter().map(Arc::new))
    }

    pub fn name(&self) -> Option<&Symbol> {
        self.name.as_ref()
    }

    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .map_or_else(|| "anonymous function".to_string(), Symbol::qualified_name)
    }

    /// Every accepted arity, fixed ones first.
    pub fn arity(&self) -> AritySpec {
        let specs = self
            .fixed_bodies()
            .chain(self.variadic.iter())
            .map(|f| f.arity())
            .collect();
        AritySpec::OneOf(specs)
    }

    fn fixed_bodies(&self) -> impl Iterator<Item = &Arc<Function>> {
        self.fixed.iter().flatten()
    }

    /// All bodies: fixed by arity, then variadic in registration order.
    pub fn bodies(&self) -> Vec<Arc<Function>> {
        self.fixed_bodies()
            .chain(self.variadic.iter())
            .cloned()
            .collect()
    }

    pub fn resolve(&self, argc: usize) -> Result<Arc<Function>> {
        if let Some(hit) = self.cache.get(&argc) {
            return Ok(Arc::clone(hit.value()));
        }
        let found = self
            .find(argc)
            .ok_or_else(|| Error::arity_named(self.display_name(), self.arity(), argc))?;
        trace!(function = %self.display_name(), argc, "cached arity resolution");
        self.cache.insert(argc, Arc::clone(&found));
        Ok(found)
    }

    fn find(&self, argc: usize) -> Option<Arc<Function>> {
        if let Some(Some(exact)) = self.fixed.get(argc) {
            return Some(Arc::clone(exact));
        }
        let mut best: Option<&Arc<Function>> = None;
        for candidate in &self.variadic {
            let prefix = candidate.fixed_args();
            if prefix <= argc && best.is_none_or(|b| prefix > b.fixed_args()) {
                best = Some(candidate);
            }
        }
        best.cloned()
    }
}

impl std::fmt::Debug for MultiArityFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiArityFn")
            .field("name", &self.display_name())
            .field("arity", &self.arity())
            .field("cached", &self.cache.len())
            .finish()
    }
}
