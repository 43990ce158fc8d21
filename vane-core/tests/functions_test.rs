// vane-core - Function integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for functions: script bodies, doc metadata, the
//! interceptor hook, and functions as values.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::*;
use vane_core::{FnDoc, Interceptor, ScriptBody};

/// A stand-in evaluator body that returns its parameters as a vector.
struct EchoParams;

impl ScriptBody for EchoParams {
    fn call(&self, _ctx: &CallContext, function: &Function, args: &[Value]) -> Result<Value> {
        let fixed = function.fixed_args();
        let mut out: Vec<Value> = args[..fixed].to_vec();
        if function.is_variadic() {
            out.push(Value::list(args[fixed..].iter().cloned()));
        }
        Ok(Value::vector(out))
    }
}

fn params(names: &[&str]) -> Vec<Symbol> {
    names.iter().map(|n| Symbol::new(n)).collect()
}

// =============================================================================
// Script bodies
// =============================================================================

#[test]
fn test_script_function_arity() {
    let f = Function::script(
        Some(Symbol::new("pair")),
        params(&["a", "rest"]),
        true,
        Arc::new(EchoParams),
    );
    assert_eq!(f.fixed_args(), 1);
    assert!(!f.is_native());

    let ctx = CallContext::new();
    let r = f.invoke(&ctx, &[long(1), long(2), long(3)]).unwrap();
    assert_eq!(r, Value::vector([long(1), Value::list([long(2), long(3)])]));
    assert!(matches!(f.invoke(&ctx, &[]), Err(Error::Arity { .. })));
}

#[test]
fn test_script_body_is_not_intercepted() {
    struct DenyAll;
    impl Interceptor for DenyAll {
        fn before_native(&self, function: &Function, _args: &[Value]) -> Result<()> {
            Err(Error::Intercepted {
                name: function.display_name(),
                reason: "sandboxed".to_string(),
            })
        }
    }

    let ctx = CallContext::builder().interceptor(Arc::new(DenyAll)).build();
    let script = Function::script(None, params(&["x"]), false, Arc::new(EchoParams));
    assert!(script.invoke(&ctx, &[long(1)]).is_ok());

    let err = call_in(&ctx, "inc", &[long(1)]).unwrap_err();
    assert_eq!(err.to_string(), "Call to inc rejected: sandboxed");
}

fn call_in(ctx: &CallContext, name: &str, args: &[Value]) -> Result<Value> {
    let f = vane_core::lookup(name).unwrap();
    Dispatchable::from_value(&f).unwrap().apply_in(ctx, args)
}

#[test]
fn test_interceptor_sees_nested_native_calls() {
    struct Counter(AtomicUsize);
    impl Interceptor for Counter {
        fn before_native(&self, _function: &Function, _args: &[Value]) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let counter = Arc::new(Counter(AtomicUsize::new(0)));
    let ctx = CallContext::builder().interceptor(counter.clone()).build();
    let a = call_in(&ctx, "atom", &[long(0)]).unwrap();
    let inc = vane_core::lookup("inc").unwrap();
    call_in(&ctx, "swap!", &[a, inc]).unwrap();
    // atom, swap!, and the inc it applies
    assert_eq!(counter.0.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Metadata
// =============================================================================

#[test]
fn test_doc_meta() {
    let f = Function::native("greet", 1, false, |args| Ok(args[0].clone())).with_doc(FnDoc {
        doc: Some("Returns its argument.".to_string()),
        arglists: vec!["(greet x)".to_string()],
        examples: vec!["(greet 1)".to_string()],
        see_also: vec![Symbol::new("identity")],
    });
    let meta = f.doc_meta();
    assert_eq!(
        meta.get(&Value::keyword("doc")),
        Some(&Value::from("Returns its argument."))
    );
    assert_eq!(
        meta.get(&Value::keyword("arglists")),
        Some(&Value::vector([Value::from("(greet x)")]))
    );
    assert_eq!(
        meta.get(&Value::keyword("see-also")),
        Some(&Value::vector([Value::symbol("identity")]))
    );
    assert_eq!(meta.get(&Value::keyword("native")), Some(&Value::from(true)));
    assert_eq!(meta.get(&Value::keyword("macro")), Some(&Value::from(false)));
}

#[test]
fn test_macro_flag() {
    let f = Function::script(None, params(&["form"]), false, Arc::new(EchoParams)).into_macro();
    assert!(f.is_macro());
    assert_eq!(f.doc_meta().get(&Value::keyword("macro")), Some(&Value::from(true)));
}

// =============================================================================
// Functions as values
// =============================================================================

#[test]
fn test_function_value_identity() {
    let f = vane_core::lookup("+").unwrap();
    let g = vane_core::lookup("+").unwrap();
    let h = vane_core::lookup("-").unwrap();
    assert_eq!(f.type_name(), "function");
    assert_eq!(f, g);
    assert_ne!(f, h);
    assert_eq!(f.type_keyword(), Keyword::core("function"));
}
