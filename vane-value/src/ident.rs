// vane-value - Interned keywords and symbols
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords and symbols: optionally namespaced, interned identifiers.
//!
//! Both kinds share one interner implementation but live in separate tables,
//! so `:foo` and `foo` never alias. Interned identifiers are never freed;
//! equality and hashing are pointer operations once an identifier exists.
//!
//! The tables sit behind a `parking_lot::Mutex`. Creation takes the lock,
//! comparison and lookup of an existing identifier do not.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

#[derive(Debug)]
struct Ident {
    namespace: Option<Arc<str>>,
    name: Arc<str>,
}

impl Ident {
    fn cmp_parts(&self, other: &Ident) -> Ordering {
        self.namespace
            .as_deref()
            .cmp(&other.namespace.as_deref())
            .then_with(|| self.name.cmp(&other.name))
    }
}

#[derive(Default)]
struct Interner {
    idents: HashMap<(Option<Arc<str>>, Arc<str>), Arc<Ident>>,
}

impl Interner {
    fn intern(&mut self, namespace: Option<&str>, name: &str) -> Arc<Ident> {
        let key: (Option<Arc<str>>, Arc<str>) = (namespace.map(Arc::from), Arc::from(name));
        if let Some(existing) = self.idents.get(&key) {
            return Arc::clone(existing);
        }
        let ident = Arc::new(Ident {
            namespace: key.0.clone(),
            name: key.1.clone(),
        });
        self.idents.insert(key, Arc::clone(&ident));
        ident
    }
}

static KEYWORDS: OnceLock<Mutex<Interner>> = OnceLock::new();
static SYMBOLS: OnceLock<Mutex<Interner>> = OnceLock::new();

fn intern_in(table: &'static OnceLock<Mutex<Interner>>, ns: Option<&str>, name: &str) -> Arc<Ident> {
    table
        .get_or_init(|| Mutex::new(Interner::default()))
        .lock()
        .intern(ns, name)
}

/// Splits `ns/name` at the first slash. A lone `/` is a name, not a separator.
fn split_qualified(s: &str) -> (Option<&str>, &str) {
    match s.find('/') {
        Some(pos) if s.len() > 1 => (Some(&s[..pos]), &s[pos + 1..]),
        _ => (None, s),
    }
}

macro_rules! interned_ident {
    ($(#[$doc:meta])* $ty:ident, $table:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $ty {
            inner: Arc<Ident>,
        }

        impl $ty {
            /// Intern an unqualified identifier.
            pub fn new(name: &str) -> Self {
                $ty {
                    inner: intern_in(&$table, None, name),
                }
            }

            /// Intern a namespace-qualified identifier.
            pub fn with_namespace(namespace: &str, name: &str) -> Self {
                $ty {
                    inner: intern_in(&$table, Some(namespace), name),
                }
            }

            /// Parse `ns/name` or `name`, ignoring a leading print prefix.
            pub fn parse(s: &str) -> Self {
                let s = s.strip_prefix($prefix).unwrap_or(s);
                match split_qualified(s) {
                    (Some(ns), name) => $ty::with_namespace(ns, name),
                    (None, name) => $ty::new(name),
                }
            }

            #[inline]
            #[must_use]
            pub fn namespace(&self) -> Option<&str> {
                self.inner.namespace.as_deref()
            }

            #[inline]
            #[must_use]
            pub fn name(&self) -> &str {
                &self.inner.name
            }

            /// `ns/name` or `name`, without the print prefix.
            pub fn qualified_name(&self) -> String {
                match self.namespace() {
                    Some(ns) => format!("{}/{}", ns, self.name()),
                    None => self.name().to_string(),
                }
            }

            #[inline]
            fn addr(&self) -> usize {
                Arc::as_ptr(&self.inner) as usize
            }
        }

        impl PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.inner, &other.inner)
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.addr().hash(state);
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                if self == other {
                    Ordering::Equal
                } else {
                    self.inner.cmp_parts(&other.inner)
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.qualified_name())
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    };
}

interned_ident!(
    /// A self-evaluating identifier, printed with a leading colon.
    Keyword,
    KEYWORDS,
    ":"
);

interned_ident!(
    /// A name that the evaluator resolves to a value.
    Symbol,
    SYMBOLS,
    ""
);

impl Keyword {
    /// Keyword in the `core` namespace, as used for built-in type tags.
    pub fn core(name: &str) -> Self {
        Keyword::with_namespace("core", name)
    }
}
