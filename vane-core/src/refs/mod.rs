// vane-core - Mutable references
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Operations on the three kinds of mutable state: atoms (shared,
//! compare-and-swap), volatiles (single writer, no retry) and the
//! thread-local binding store.

pub mod atom;
pub mod volatile;

mod thread_local;

pub use thread_local::ThreadLocalStore;
