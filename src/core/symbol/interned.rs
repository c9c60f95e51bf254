//! Interned symbol implementation.
//!
//! Contains the `InternedSymbol` type stored in the global registry. Symbols
//! are interned by `(name, positive)` (§3 Lifecycles): two symbols with the
//! same name but different `positive` flags are distinct entries, since
//! `positive` gates real-domain simplifications (`(x^2)^(1/2) = x` only when
//! `x` is flagged positive) and must never change once a handle exists.

use std::sync::Arc;

use slotmap::{DefaultKey, Key};

/// An interned symbol - the actual data stored in the registry.
///
/// Clone-cheap: only a key, an optional name `Arc`, and a bool.
#[derive(Debug, Clone)]
pub struct InternedSymbol {
    key: DefaultKey,
    name: Option<Arc<str>>,
    positive: bool,
}

impl InternedSymbol {
    /// Create a new named interned symbol.
    pub(crate) fn new_named(name: &str, positive: bool, key: DefaultKey) -> Self {
        Self {
            key,
            name: Some(Arc::from(name)),
            positive,
        }
    }

    /// Create a new anonymous interned symbol (used for `tmpSymbol`).
    pub(crate) const fn new_anon(key: DefaultKey, positive: bool) -> Self {
        Self {
            key,
            name: None,
            positive,
        }
    }

    /// Get the symbol's unique key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> DefaultKey {
        self.key
    }

    /// Get the symbol's unique ID as a u64 (for display and external use).
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.key.data().as_ffi()
    }

    /// Get the symbol's name (`None` for anonymous/temporary symbols).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the name as `Arc<str>` (for cheap cloning).
    #[must_use]
    pub fn name_arc(&self) -> Option<Arc<str>> {
        self.name.clone()
    }

    /// Get the name as `&str` (empty for anonymous symbols).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// `positive` flag (§3 invariant 9: never changes once a handle exists).
    #[inline]
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.positive
    }

    /// True iff this symbol carries no name (a temporary symbol, §3 Lifecycles).
    #[inline]
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

// O(1) equality comparison using key only.
impl PartialEq for InternedSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for InternedSymbol {}

// Hash by key for O(1) HashMap operations.
impl std::hash::Hash for InternedSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Display for InternedSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "${}", self.id()),
        }
    }
}

impl AsRef<str> for InternedSymbol {
    fn as_ref(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

// Order per §4.4 rule 2 (both Symbol: by name); anonymous symbols sort after
// named ones, then by ID, matching the registry's historical convention.
impl PartialOrd for InternedSymbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InternedSymbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (&self.name, &other.name) {
            (Some(a), Some(b)) => a.cmp(b).then_with(|| self.positive.cmp(&other.positive)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => self.id().cmp(&other.id()),
        }
    }
}
