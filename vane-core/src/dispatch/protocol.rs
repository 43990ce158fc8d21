// vane-core - Protocol dispatch
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Protocol functions: dispatch on the type of the first argument.
//!
//! Implementations are keyed by type keyword. A call looks up the first
//! argument's [`type_keyword`](Value::type_keyword), then each keyword in
//! its [`supertypes`](Value::supertypes) chain. When an implementation is
//! found but has no body for the call's arity, or when nothing is found,
//! the protocol's default (if any) resolves the call by arity instead.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};
use vane_value::{Keyword, Symbol, Value};

use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::function::Function;

use super::{Dispatchable, MultiArityFn};

pub struct ProtocolFn {
    name: Symbol,
    default: Option<Arc<MultiArityFn>>,
    impls: RwLock<HashMap<Keyword, Dispatchable>>,
}

impl ProtocolFn {
    pub fn new(name: Symbol, default: Option<MultiArityFn>) -> Self {
        ProtocolFn {
            name,
            default: default.map(Arc::new),
            impls: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn default(&self) -> Option<&Arc<MultiArityFn>> {
        self.default.as_ref()
    }

    /// Register the implementation for `type_key`, replacing any previous one.
    pub fn extend(
        &self,
        type_key: Keyword,
        implementation: impl Into<Dispatchable>,
    ) -> Option<Dispatchable> {
        debug!(protocol = %self.name, type_key = %type_key, "extending protocol");
        self.impls.write().insert(type_key, implementation.into())
    }

    /// Remove the implementation for `type_key`; calls revert to the default.
    pub fn remove(&self, type_key: &Keyword) -> Option<Dispatchable> {
        debug!(protocol = %self.name, type_key = %type_key, "removing protocol implementation");
        self.impls.write().remove(type_key)
    }

    pub fn is_extended(&self, type_key: &Keyword) -> bool {
        self.impls.read().contains_key(type_key)
    }

    pub fn extended_types(&self) -> Vec<Keyword> {
        let mut types: Vec<Keyword> = self.impls.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Whether `value` has an implementation, directly or via a supertype.
    pub fn satisfies(&self, value: &Value) -> bool {
        self.implementation_for(value).is_some()
    }

    /// The implementation for `value` and the type keyword it was found under.
    pub fn implementation_for(&self, value: &Value) -> Option<(Keyword, Dispatchable)> {
        let impls = self.impls.read();
        if impls.is_empty() {
            return None;
        }
        std::iter::once(value.type_keyword())
            .chain(value.supertypes())
            .find_map(|key| impls.get(&key).cloned().map(|imp| (key, imp)))
    }

    pub fn resolve(&self, ctx: &CallContext, args: &[Value]) -> Result<Arc<Function>> {
        let Some(target) = args.first() else {
            return self.resolve_default(0, &Value::nil());
        };
        match self.implementation_for(target) {
            Some((type_key, implementation)) => {
                trace!(protocol = %self.name, type_key = %type_key, "resolved implementation");
                match implementation.resolve(ctx, args) {
                    Err(Error::Arity { .. }) if self.default.is_some() => {
                        trace!(protocol = %self.name, argc = args.len(), "arity mismatch, using default");
                        self.resolve_default(args.len(), &Value::from(type_key))
                    }
                    resolved => resolved,
                }
            }
            None => self.resolve_default(args.len(), &Value::from(target.type_keyword())),
        }
    }

    fn resolve_default(&self, argc: usize, key: &Value) -> Result<Arc<Function>> {
        match &self.default {
            Some(default) => default.resolve(argc),
            None => Err(Error::dispatch(self.name.qualified_name(), key)),
        }
    }
}

impl std::fmt::Debug for ProtocolFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolFn")
            .field("name", &self.name)
            .field("types", &self.extended_types())
            .field("default", &self.default.is_some())
            .finish()
    }
}
