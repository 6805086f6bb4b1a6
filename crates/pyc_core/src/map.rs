//! Deterministic fast hash maps for name tables.

use ahash::RandomState;
use hashbrown::{HashMap, HashSet};
use std::hash::Hash;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;
pub type FastHashSet<T> = HashSet<T, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_set_new<T: Eq + Hash>() -> FastHashSet<T> {
    HashSet::with_hasher(fast_hasher())
}
