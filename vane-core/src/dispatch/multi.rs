// vane-core - Multimethod dispatch
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Multimethods: `defmulti` / `defmethod` / `remove-method`.
//!
//! A multimethod calls its discriminator on the arguments to get a dispatch
//! key, then looks the key up in its method table. A key with no method
//! falls back to the method registered under the default key (`:default`
//! unless configured otherwise). Method tables may change at any time; the
//! last registration for a key wins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};
use vane_value::{Keyword, Payload, Symbol, Value};

use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::function::Function;

use super::Dispatchable;

pub struct MultiFn {
    name: Symbol,
    discriminator: Dispatchable,
    default_key: Value,
    methods: RwLock<HashMap<Value, Dispatchable>>,
}

impl MultiFn {
    /// Build from a discriminator value.
    ///
    /// The discriminator must be a function or a keyword; a keyword looks
    /// itself up in the first argument. Nil or any other value is rejected.
    pub fn new(name: Symbol, discriminator: &Value) -> Result<Self> {
        let dispatch = match discriminator.payload() {
            Payload::Nil => {
                return Err(Error::construction(
                    "multimethod",
                    format!("{} requires a dispatch function, got nil", name.qualified_name()),
                ));
            }
            Payload::Keyword(k) => keyword_lookup(k.clone()),
            _ => Dispatchable::from_value(discriminator).ok_or_else(|| {
                Error::construction(
                    "multimethod",
                    format!(
                        "{} dispatch function must be callable, got {}",
                        name.qualified_name(),
                        discriminator.type_name()
                    ),
                )
            })?,
        };
        Ok(MultiFn::with_dispatch(name, dispatch))
    }

    pub fn with_dispatch(name: Symbol, discriminator: Dispatchable) -> Self {
        MultiFn {
            name,
            discriminator,
            default_key: Value::keyword("default"),
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_default_key(mut self, key: Value) -> Self {
        self.default_key = key;
        self
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn default_key(&self) -> &Value {
        &self.default_key
    }

    /// Install `method` for `key`, returning the method it replaced.
    pub fn register(&self, key: Value, method: impl Into<Dispatchable>) -> Option<Dispatchable> {
        debug!(multimethod = %self.name, dispatch_value = %key, "registering method");
        self.methods.write().insert(key, method.into())
    }

    pub fn unregister(&self, key: &Value) -> Option<Dispatchable> {
        debug!(multimethod = %self.name, dispatch_value = %key, "removing method");
        self.methods.write().remove(key)
    }

    pub fn clear(&self) {
        self.methods.write().clear();
    }

    pub fn is_registered(&self, key: &Value) -> bool {
        self.methods.read().contains_key(key)
    }

    /// The method a call with dispatch key `key` would use.
    pub fn get_method(&self, key: &Value) -> Option<Dispatchable> {
        let methods = self.methods.read();
        methods
            .get(key)
            .or_else(|| methods.get(&self.default_key))
            .cloned()
    }

    /// The method table, ordered by dispatch key.
    pub fn methods(&self) -> Vec<(Value, Dispatchable)> {
        let mut entries: Vec<(Value, Dispatchable)> = self
            .methods
            .read()
            .iter()
            .map(|(k, m)| (k.clone(), m.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn dispatch_value(&self, ctx: &CallContext, args: &[Value]) -> Result<Value> {
        self.discriminator.apply_in(ctx, args)
    }

    pub fn resolve(&self, ctx: &CallContext, args: &[Value]) -> Result<Arc<Function>> {
        let key = self.dispatch_value(ctx, args)?;
        let Some(method) = self.get_method(&key) else {
            return Err(Error::dispatch(self.name.qualified_name(), &key));
        };
        trace!(multimethod = %self.name, dispatch_value = %key, "resolved method");
        method.resolve(ctx, args)
    }
}

/// `(:k x & _)` as a discriminator: the value under `k` in a map first argument.
fn keyword_lookup(key: Keyword) -> Dispatchable {
    let name = key.to_string();
    let lookup = Value::from(key);
    Function::native(&name, 1, true, move |args| {
        Ok(match args[0].payload() {
            Payload::Map(m) => m.get(&lookup).cloned().unwrap_or_else(Value::nil),
            _ => Value::nil(),
        })
    })
    .into()
}

impl std::fmt::Debug for MultiFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiFn")
            .field("name", &self.name)
            .field("default_key", &self.default_key)
            .field("methods", &self.methods.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(label: &'static str) -> Function {
        Function::native(label, 1, false, move |_| Ok(Value::from(label)))
    }

    #[test]
    fn test_nil_discriminator_rejected() {
        let err = MultiFn::new(Symbol::new("area"), &Value::nil()).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
        let err = MultiFn::new(Symbol::new("area"), &Value::from(3i64)).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_keyword_discriminator() {
        let m = MultiFn::new(Symbol::new("area"), &Value::keyword("shape")).unwrap();
        m.register(Value::keyword("circle"), constant("circle"));
        let arg = Value::map([(Value::keyword("shape"), Value::keyword("circle"))]);
        let f = m.resolve(&CallContext::new(), &[arg]).unwrap();
        assert_eq!(f.display_name(), "circle");
    }

    #[test]
    fn test_last_registration_wins() {
        let m = MultiFn::new(Symbol::new("m"), &Value::keyword("k")).unwrap();
        assert!(m.register(Value::from(1i64), constant("first")).is_none());
        assert!(m.register(Value::from(1i64), constant("second")).is_some());
        let f = m.get_method(&Value::from(1i32)).unwrap();
        assert_eq!(f.display_name(), "second");
    }

    #[test]
    fn test_custom_default_key() {
        let m = MultiFn::new(Symbol::new("m"), &Value::keyword("k"))
            .unwrap()
            .with_default_key(Value::keyword("otherwise"));
        m.register(Value::keyword("otherwise"), constant("fallback"));
        let f = m
            .resolve(&CallContext::new(), &[Value::map(Vec::new())])
            .unwrap();
        assert_eq!(f.display_name(), "fallback");
    }
}
