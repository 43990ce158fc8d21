// vane-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Native functions over the value core, ready for a module loader to bind.
//!
//! Each built-in is a [`Function`] wrapped as a function value. Arity is
//! declared at registration and checked by [`Function::invoke`], so the
//! implementations index their arguments directly.

mod arithmetic;
mod atoms;
mod comparison;

use std::sync::OnceLock;

use vane_value::{Symbol, Value};

use crate::context::CallContext;
use crate::dispatch::Dispatchable;
use crate::error::Result;
use crate::function::{FnDoc, Function};

use arithmetic::{
    builtin_abs, builtin_add, builtin_dec, builtin_div, builtin_inc, builtin_max, builtin_min,
    builtin_mul, builtin_negate, builtin_rem, builtin_sqrt, builtin_square, builtin_sub,
};
use atoms::{
    builtin_add_watch, builtin_atom, builtin_compare_and_set, builtin_deref, builtin_remove_watch,
    builtin_reset, builtin_reset_vals, builtin_set_validator, builtin_swap, builtin_swap_vals,
    builtin_volatile, builtin_vreset, builtin_vswap,
};
use comparison::{
    builtin_compare, builtin_eq, builtin_ge, builtin_gt, builtin_identical_p, builtin_le,
    builtin_lt, builtin_match_p, builtin_neg_p, builtin_num_eq, builtin_number_p, builtin_pos_p,
    builtin_zero_p,
};

type Plain = fn(&[Value]) -> Result<Value>;
type WithContext = fn(&CallContext, &[Value]) -> Result<Value>;

#[derive(Default)]
struct Table {
    entries: Vec<(Symbol, Value)>,
}

impl Table {
    fn add(&mut self, function: Function, arglists: &[&str]) {
        let doc = FnDoc {
            arglists: arglists.iter().map(|s| s.to_string()).collect(),
            ..FnDoc::default()
        };
        let function = function.with_doc(doc);
        let Some(name) = function.name().cloned() else {
            return;
        };
        self.entries
            .push((name, Dispatchable::from(function).into_value()));
    }

    fn native(&mut self, name: &str, fixed: usize, variadic: bool, arglists: &[&str], f: Plain) {
        self.add(Function::native(name, fixed, variadic, f), arglists);
    }

    fn native_ctx(
        &mut self,
        name: &str,
        fixed: usize,
        variadic: bool,
        arglists: &[&str],
        f: WithContext,
    ) {
        self.add(Function::native_ctx(name, fixed, variadic, f), arglists);
    }
}

fn table() -> &'static [(Symbol, Value)] {
    static TABLE: OnceLock<Vec<(Symbol, Value)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = Table::default();

        // Arithmetic
        t.native("+", 0, true, &["(+ & xs)"], builtin_add);
        t.native("-", 1, true, &["(- x & ys)"], builtin_sub);
        t.native("*", 0, true, &["(* & xs)"], builtin_mul);
        t.native("/", 1, true, &["(/ x & ys)"], builtin_div);
        t.native("rem", 2, false, &["(rem num div)"], builtin_rem);
        t.native("inc", 1, false, &["(inc x)"], builtin_inc);
        t.native("dec", 1, false, &["(dec x)"], builtin_dec);
        t.native("negate", 1, false, &["(negate x)"], builtin_negate);
        t.native("square", 1, false, &["(square x)"], builtin_square);
        t.native("sqrt", 1, false, &["(sqrt x)"], builtin_sqrt);
        t.native("abs", 1, false, &["(abs x)"], builtin_abs);
        t.native("min", 1, true, &["(min x & more)"], builtin_min);
        t.native("max", 1, true, &["(max x & more)"], builtin_max);

        // Comparison
        t.native("==", 1, true, &["(== x & more)"], builtin_num_eq);
        t.native("<", 1, true, &["(< x & more)"], builtin_lt);
        t.native(">", 1, true, &["(> x & more)"], builtin_gt);
        t.native("<=", 1, true, &["(<= x & more)"], builtin_le);
        t.native(">=", 1, true, &["(>= x & more)"], builtin_ge);
        t.native("compare", 2, false, &["(compare a b)"], builtin_compare);
        t.native("=", 1, true, &["(= x & more)"], builtin_eq);
        t.native("identical?", 2, false, &["(identical? a b)"], builtin_identical_p);
        t.native("match?", 2, false, &["(match? s pattern)"], builtin_match_p);

        // Numeric predicates
        t.native("zero?", 1, false, &["(zero? x)"], builtin_zero_p);
        t.native("pos?", 1, false, &["(pos? x)"], builtin_pos_p);
        t.native("neg?", 1, false, &["(neg? x)"], builtin_neg_p);
        t.native("number?", 1, false, &["(number? x)"], builtin_number_p);

        // Atoms
        t.native("atom", 1, false, &["(atom x)"], builtin_atom);
        t.native("deref", 1, false, &["(deref ref)"], builtin_deref);
        t.native_ctx("reset!", 2, false, &["(reset! atom newval)"], builtin_reset);
        t.native_ctx("reset-vals!", 2, false, &["(reset-vals! atom newval)"], builtin_reset_vals);
        t.native_ctx("swap!", 2, true, &["(swap! atom f & args)"], builtin_swap);
        t.native_ctx("swap-vals!", 2, true, &["(swap-vals! atom f & args)"], builtin_swap_vals);
        t.native_ctx(
            "compare-and-set!",
            3,
            false,
            &["(compare-and-set! atom oldval newval)"],
            builtin_compare_and_set,
        );
        t.native("add-watch", 3, false, &["(add-watch atom key f)"], builtin_add_watch);
        t.native("remove-watch", 2, false, &["(remove-watch atom key)"], builtin_remove_watch);
        t.native_ctx(
            "set-validator!",
            2,
            false,
            &["(set-validator! atom f)"],
            builtin_set_validator,
        );

        // Volatiles
        t.native("volatile", 1, false, &["(volatile x)"], builtin_volatile);
        t.native("vreset!", 2, false, &["(vreset! vol newval)"], builtin_vreset);
        t.native_ctx("vswap!", 2, true, &["(vswap! vol f & args)"], builtin_vswap);

        t.entries
    })
}

/// Every built-in as a `(name, function value)` pair.
pub fn builtins() -> Vec<(Symbol, Value)> {
    table().to_vec()
}

/// The built-in bound to `name`.
pub fn lookup(name: &str) -> Option<Value> {
    let name = Symbol::parse(name);
    table()
        .iter()
        .find(|(sym, _)| *sym == name)
        .map(|(_, value)| value.clone())
}
