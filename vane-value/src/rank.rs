// vane-value - Type rank
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A static total order over value categories.
//!
//! Rank is the first key when ordering heterogeneous values: a nil sorts
//! before any boolean, any boolean before any number, and so on. All six
//! numeric variants share a rank so that `1 < 1.5 < 2M` orders by value.
//! Lists and vectors share a rank because they compare equal element-wise.

/// Category rank, ordered by declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeRank {
    Nil,
    Boolean,
    Number,
    Char,
    String,
    Keyword,
    Symbol,
    Sequential,
    Map,
    Set,
    ByteBuf,
    Function,
    Atom,
    Volatile,
    Host,
}

impl TypeRank {
    /// Whether values of this rank compare by identity rather than content.
    pub fn is_identity_ranked(self) -> bool {
        matches!(
            self,
            TypeRank::Function | TypeRank::Atom | TypeRank::Volatile | TypeRank::Host
        )
    }
}
