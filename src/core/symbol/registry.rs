//! Global symbol registry.
//!
//! Sharded (`NUM_SHARDS` buckets) to minimize lock contention, using
//! `FxHashMap`/`FxHasher` for fast short-string lookups — the same approach
//! the teacher crate uses for its symbol table. Symbols are interned by
//! `(name, positive)` (§3 Lifecycles): the table key is the pair, not the
//! bare name.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::{FxHashMap, FxHasher};
use std::hash::Hasher;
use tracing::warn;

use super::interned::InternedSymbol;

const NUM_SHARDS: usize = 16;

/// Reserved prefix for anonymous/temporary symbol names (§3 Lifecycles, §7
/// `Precondition`: creating a symbol whose name starts with this prefix is
/// API misuse).
pub const TEMP_SYMBOL_PREFIX: &str = "$tmp";

struct RegistryShard {
    by_name: FxHashMap<(String, bool), InternedSymbol>,
}

struct SymbolRegistry {
    shards: [RwLock<RegistryShard>; NUM_SHARDS],
    tmp_counter: AtomicU64,
}

impl SymbolRegistry {
    fn new() -> Self {
        let shards: [RwLock<RegistryShard>; NUM_SHARDS] = std::array::from_fn(|_| {
            RwLock::new(RegistryShard {
                by_name: FxHashMap::default(),
            })
        });
        Self {
            shards,
            tmp_counter: AtomicU64::new(0),
        }
    }

    fn get_shard(&self, name: &str) -> &RwLock<RegistryShard> {
        let mut hasher = FxHasher::default();
        std::hash::Hash::hash(name, &mut hasher);
        let hash = hasher.finish();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "only the low bits are needed to pick a shard"
        )]
        let shard_idx = (hash as usize) % NUM_SHARDS;
        &self.shards[shard_idx]
    }
}

static REGISTRY: std::sync::LazyLock<SymbolRegistry> = std::sync::LazyLock::new(SymbolRegistry::new);

/// Get or create the interned symbol for `(name, positive)`.
///
/// If `name` starts with [`TEMP_SYMBOL_PREFIX`] this is API misuse (§7
/// `Precondition`): the event is logged and a fresh anonymous temporary
/// symbol is returned instead of honoring the reserved name.
///
/// # Panics
/// Panics if the relevant registry shard's lock is poisoned.
#[must_use]
pub fn intern_symbol(name: &str, positive: bool) -> InternedSymbol {
    if name.starts_with(TEMP_SYMBOL_PREFIX) {
        warn!(name, "refusing to intern a symbol using the reserved temporary-symbol prefix");
        return tmp_symbol(positive);
    }

    let shard_lock = REGISTRY.get_shard(name);
    let key = (name.to_owned(), positive);

    {
        let shard = shard_lock.read().expect("symbol registry shard poisoned");
        if let Some(sym) = shard.by_name.get(&key) {
            return sym.clone();
        }
    }

    let mut shard = shard_lock.write().expect("symbol registry shard poisoned");
    if let Some(sym) = shard.by_name.get(&key) {
        return sym.clone();
    }

    let slot_key = GLOBAL_SLOTS.write().expect("symbol slot map poisoned").insert(());
    let interned = InternedSymbol::new_named(name, positive, slot_key);
    shard.by_name.insert(key, interned.clone());
    interned
}

/// Mint a fresh anonymous temporary symbol (`tmpSymbol` in §6).
///
/// Temporary symbols are never registered by name — they are anonymous and
/// garbage-collected when the last handle referencing them drops (§3
/// Lifecycles), matching the teacher's `Symbol::anon()` optimization of
/// skipping the global name table for these.
#[must_use]
pub fn tmp_symbol(positive: bool) -> InternedSymbol {
    REGISTRY.tmp_counter.fetch_add(1, Ordering::Relaxed);
    let slot_key = GLOBAL_SLOTS.write().expect("symbol slot map poisoned").insert(());
    InternedSymbol::new_anon(slot_key, positive)
}

/// Number of distinct named `(name, positive)` symbols currently interned.
///
/// # Panics
/// Panics if any registry shard's lock is poisoned.
#[must_use]
pub fn symbol_count() -> usize {
    REGISTRY
        .shards
        .iter()
        .map(|shard_lock| shard_lock.read().expect("symbol registry shard poisoned").by_name.len())
        .sum()
}

/// Clear every interned symbol (part of §4.13 `clearAllCaches`).
///
/// # Panics
/// Panics if any registry shard's lock is poisoned.
pub fn clear_symbols() {
    for shard_lock in &REGISTRY.shards {
        shard_lock.write().expect("symbol registry shard poisoned").by_name.clear();
    }
}

// A slotmap purely to mint stable, collision-free `DefaultKey`s for symbol
// identity; the registry above is the name->symbol index, this is the
// identity source. Keeping them separate means temporary symbols (never
// named) still get keys from the same space as named ones.
static GLOBAL_SLOTS: std::sync::LazyLock<RwLock<slotmap::SlotMap<slotmap::DefaultKey, ()>>> =
    std::sync::LazyLock::new(|| RwLock::new(slotmap::SlotMap::new()));
