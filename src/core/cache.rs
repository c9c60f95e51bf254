//! Process-wide cache registry (§4.13): a registry of clearable memo maps
//! keyed by the map's stable address. Each [`MemoMap`] registers a clear
//! closure at construction and deregisters it at teardown (`Drop`);
//! [`clear_all_caches`] invokes every closure still registered.
//!
//! Caches are single-writer (§5 concurrency model): callers must not invoke
//! [`clear_all_caches`] concurrently with other core operations.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use rustc_hash::FxHashMap;

type ClearFn = Box<dyn Fn() + Send + Sync>;

struct Registry {
    next_id: AtomicU64,
    entries: RwLock<FxHashMap<u64, ClearFn>>,
}

static REGISTRY: std::sync::LazyLock<Registry> = std::sync::LazyLock::new(|| Registry {
    next_id: AtomicU64::new(0),
    entries: RwLock::new(FxHashMap::default()),
});

/// Deregisters its clear closure from the process-wide registry on drop, so
/// a [`MemoMap`] going out of scope stops being swept by
/// [`clear_all_caches`].
struct Registration(u64);

impl Drop for Registration {
    fn drop(&mut self) {
        REGISTRY.entries.write().expect("cache registry poisoned").remove(&self.0);
    }
}

fn register(clear: ClearFn) -> Registration {
    let id = REGISTRY.next_id.fetch_add(1, Ordering::Relaxed);
    REGISTRY.entries.write().expect("cache registry poisoned").insert(id, clear);
    Registration(id)
}

/// A single memoized-operation cache (§4.13): a flat hash map keyed by the
/// operand handles' structural hash + structural equality. One `MemoMap` is
/// created per memoized operation; it registers itself with the process-wide
/// registry so a bulk [`clear_all_caches`] sweeps it too.
pub struct MemoMap<K, V> {
    inner: Arc<RwLock<FxHashMap<K, V>>>,
    _registration: Registration,
}

impl<K, V> MemoMap<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty, registered memo map.
    #[must_use]
    pub fn new() -> Self {
        let inner: Arc<RwLock<FxHashMap<K, V>>> = Arc::new(RwLock::new(FxHashMap::default()));
        let weak: Weak<RwLock<FxHashMap<K, V>>> = Arc::downgrade(&inner);
        let registration = register(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.write().expect("memo map poisoned").clear();
            }
        }));
        Self { inner, _registration: registration }
    }

    /// Returns the cached value for `key`, computing and inserting it via
    /// `compute` if absent.
    ///
    /// # Panics
    /// Panics if the map's lock is poisoned.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.inner.read().expect("memo map poisoned").get(&key) {
            return value.clone();
        }
        let value = compute();
        self.inner.write().expect("memo map poisoned").insert(key, value.clone());
        value
    }

    /// Number of entries currently cached.
    ///
    /// # Panics
    /// Panics if the map's lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("memo map poisoned").len()
    }

    /// Whether the map currently holds no entries.
    ///
    /// # Panics
    /// Panics if the map's lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("memo map poisoned").is_empty()
    }

    /// Clears this map's entries without waiting for a bulk
    /// [`clear_all_caches`] sweep.
    ///
    /// # Panics
    /// Panics if the map's lock is poisoned.
    pub fn clear(&self) {
        self.inner.write().expect("memo map poisoned").clear();
    }
}

impl<K, V> Default for MemoMap<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// `clearAllCaches` (§6 lifecycle, §4.13): invokes every registered memo
/// map's clear closure, plus the symbol intern table and temporary-symbol
/// identity space, which are process-wide state of the same kind.
///
/// # Panics
/// Panics if the cache registry lock, or any individual memo map's lock, is
/// poisoned.
pub fn clear_all_caches() {
    let entries = REGISTRY.entries.read().expect("cache registry poisoned");
    for clear in entries.values() {
        clear();
    }
    drop(entries);
    crate::core::symbol::clear_symbols();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test module")]
mod tests {
    use super::*;

    #[test]
    fn memoizes_on_first_computation_only() {
        let map: MemoMap<u64, u64> = MemoMap::new();
        let calls = std::sync::atomic::AtomicU64::new(0);
        let compute = |n: u64| {
            calls.fetch_add(1, Ordering::Relaxed);
            n * 2
        };
        assert_eq!(map.get_or_insert_with(3, || compute(3)), 6);
        assert_eq!(map.get_or_insert_with(3, || compute(3)), 6);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn clear_all_caches_empties_every_live_map() {
        let map: MemoMap<u64, u64> = MemoMap::new();
        map.get_or_insert_with(1, || 1);
        assert_eq!(map.len(), 1);
        clear_all_caches();
        assert!(map.is_empty());
    }

    #[test]
    fn dropped_map_deregisters_without_poisoning_the_registry() {
        {
            let map: MemoMap<u64, u64> = MemoMap::new();
            map.get_or_insert_with(1, || 1);
        }
        clear_all_caches();
    }
}
