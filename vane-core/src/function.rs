// vane-core - Function abstraction
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A single concrete callable.
//!
//! A [`Function`] has one fixed parameter count, an optional rest
//! parameter, and a body that is either native Rust or supplied by the
//! evaluator through [`ScriptBody`]. Arity polymorphism, multimethods and
//! protocols are layered on top in [`crate::dispatch`], and all of them
//! bottom out in [`Function::invoke`].

use std::fmt;
use std::sync::Arc;

use vane_value::{Meta, Symbol, Value};

use crate::context::CallContext;
use crate::error::{AritySpec, Error, Result};

/// Native function body.
pub type NativeFn = dyn Fn(&CallContext, &[Value]) -> Result<Value> + Send + Sync;

/// Predicate checked against the arguments before the body runs.
pub type PreconditionFn = dyn Fn(&[Value]) -> Result<bool> + Send + Sync;

/// A body implemented by the evaluator (an interpreted function).
pub trait ScriptBody: Send + Sync {
    fn call(&self, ctx: &CallContext, function: &Function, args: &[Value]) -> Result<Value>;
}

#[derive(Clone)]
pub enum Body {
    Native(Arc<NativeFn>),
    Script(Arc<dyn ScriptBody>),
}

/// A named precondition.
#[derive(Clone)]
pub struct Precondition {
    description: String,
    check: Arc<PreconditionFn>,
}

impl Precondition {
    pub fn new(
        description: impl Into<String>,
        check: impl Fn(&[Value]) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Precondition {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Documentation read by the doc tooling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FnDoc {
    pub doc: Option<String>,
    pub arglists: Vec<String>,
    pub examples: Vec<String>,
    pub see_also: Vec<Symbol>,
}

/// A concrete callable with a single arity.
#[derive(Clone)]
pub struct Function {
    name: Option<Symbol>,
    params: Vec<Symbol>,
    fixed_args: usize,
    variadic: bool,
    is_macro: bool,
    preconditions: Vec<Precondition>,
    doc: FnDoc,
    body: Body,
}

impl Function {
    /// Native function taking `fixed_args` arguments, plus any number more
    /// when `variadic`.
    pub fn native<F>(name: &str, fixed_args: usize, variadic: bool, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Function::native_ctx(name, fixed_args, variadic, move |_, args| f(args))
    }

    /// Native function that needs the call context, e.g. to call back into
    /// other functions.
    pub fn native_ctx<F>(name: &str, fixed_args: usize, variadic: bool, f: F) -> Self
    where
        F: Fn(&CallContext, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Function {
            name: Some(Symbol::parse(name)),
            params: Vec::new(),
            fixed_args,
            variadic,
            is_macro: false,
            preconditions: Vec::new(),
            doc: FnDoc::default(),
            body: Body::Native(Arc::new(f)),
        }
    }

    /// Interpreted function. When `variadic`, the last parameter collects
    /// the rest arguments.
    pub fn script(
        name: Option<Symbol>,
        params: Vec<Symbol>,
        variadic: bool,
        body: Arc<dyn ScriptBody>,
    ) -> Self {
        let fixed_args = if variadic {
            params.len().saturating_sub(1)
        } else {
            params.len()
        };
        Function {
            name,
            params,
            fixed_args,
            variadic,
            is_macro: false,
            preconditions: Vec::new(),
            doc: FnDoc::default(),
            body: Body::Script(body),
        }
    }

    pub fn with_doc(mut self, doc: FnDoc) -> Self {
        self.doc = doc;
        self
    }

    pub fn with_params(mut self, params: Vec<Symbol>) -> Self {
        self.params = params;
        self
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    pub fn into_macro(mut self) -> Self {
        self.is_macro = true;
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn name(&self) -> Option<&Symbol> {
        self.name.as_ref()
    }

    /// Name for messages: qualified if it has one, else "anonymous function".
    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .map_or_else(|| "anonymous function".to_string(), Symbol::qualified_name)
    }

    pub fn params(&self) -> &[Symbol] {
        &self.params
    }

    pub fn fixed_args(&self) -> usize {
        self.fixed_args
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn is_macro(&self) -> bool {
        self.is_macro
    }

    pub fn is_native(&self) -> bool {
        matches!(self.body, Body::Native(_))
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn doc(&self) -> &FnDoc {
        &self.doc
    }

    pub fn arity(&self) -> AritySpec {
        if self.variadic {
            AritySpec::AtLeast(self.fixed_args)
        } else {
            AritySpec::Exact(self.fixed_args)
        }
    }

    pub fn accepts(&self, argc: usize) -> bool {
        argc == self.fixed_args || (self.variadic && argc > self.fixed_args)
    }

    // ------------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------------

    /// Check arity and preconditions, consult the interceptor for native
    /// bodies, then run the body.
    pub fn invoke(&self, ctx: &CallContext, args: &[Value]) -> Result<Value> {
        if !self.accepts(args.len()) {
            return Err(Error::arity_named(self.display_name(), self.arity(), args.len()));
        }
        for pre in &self.preconditions {
            if !(pre.check)(args)? {
                return Err(Error::Precondition {
                    name: self.display_name(),
                    condition: pre.description.clone(),
                });
            }
        }
        match &self.body {
            Body::Native(f) => {
                ctx.check_native(self, args)?;
                f(ctx, args)
            }
            Body::Script(body) => body.call(ctx, self, args),
        }
    }

    /// The documentation record as metadata, keyed `:doc`, `:arglists`,
    /// `:examples`, `:see-also`, plus `:macro` and `:native` flags.
    pub fn doc_meta(&self) -> Meta {
        let mut meta = Meta::new();
        if let Some(name) = &self.name {
            meta.insert(Value::keyword("name"), Value::from(name.clone()));
        }
        if let Some(doc) = &self.doc.doc {
            meta.insert(Value::keyword("doc"), Value::string(doc));
        }
        let strings = |items: &[String]| Value::vector(items.iter().map(Value::string));
        meta.insert(Value::keyword("arglists"), strings(&self.doc.arglists));
        meta.insert(Value::keyword("examples"), strings(&self.doc.examples));
        meta.insert(
            Value::keyword("see-also"),
            Value::vector(self.doc.see_also.iter().cloned().map(Value::from)),
        );
        meta.insert(Value::keyword("macro"), Value::from(self.is_macro));
        meta.insert(Value::keyword("native"), Value::from(self.is_native()));
        meta
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.display_name())
            .field("arity", &self.arity())
            .field("macro", &self.is_macro)
            .field("native", &self.is_native())
            .finish()
    }
}
