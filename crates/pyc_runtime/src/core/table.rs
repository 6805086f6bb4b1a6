//! Hash-keyed storage behind Dict and Set.
//!
//! Entries are bucketed by the 64-bit hash of their key. Keys whose hashes
//! collide share a bucket; callers resolve the collision by comparing the
//! stored key for equality, so a hash match alone never counts as a hit.
//! Iteration runs in ascending hash order.

use super::value::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;

pub trait TableEntry {
    fn key(&self) -> Value;
}

impl TableEntry for Value {
    fn key(&self) -> Value {
        *self
    }
}

impl TableEntry for (Value, Value) {
    fn key(&self) -> Value {
        self.0
    }
}

type Bucket<E> = SmallVec<[E; 1]>;

#[derive(Clone, Debug)]
pub struct HashTable<E> {
    buckets: BTreeMap<u64, Bucket<E>>,
    len: usize,
}

/// `key -> value` pairs.
pub type Dict = HashTable<(Value, Value)>;
/// Keys only.
pub type Set = HashTable<Value>;

impl<E: TableEntry> HashTable<E> {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Every entry whose key hashes to `hash`.
    pub fn bucket(&self, hash: u64) -> &[E] {
        self.buckets.get(&hash).map_or(&[], |b| b.as_slice())
    }

    pub fn entry_mut(&mut self, hash: u64, idx: usize) -> Option<&mut E> {
        self.buckets.get_mut(&hash)?.get_mut(idx)
    }

    pub fn push(&mut self, hash: u64, entry: E) {
        self.buckets.entry(hash).or_default().push(entry);
        self.len += 1;
    }

    pub fn remove(&mut self, hash: u64, idx: usize) -> Option<E> {
        let bucket = self.buckets.get_mut(&hash)?;
        if idx >= bucket.len() {
            return None;
        }
        let entry = bucket.remove(idx);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        self.len -= 1;
        Some(entry)
    }

    /// First entry at or after position `idx` of bucket `hash`, continuing
    /// into later buckets. Used as a resumable iteration cursor.
    pub fn next_from(&self, hash: u64, idx: usize) -> Option<(u64, usize, &E)> {
        for (&h, bucket) in self.buckets.range(hash..) {
            let start = if h == hash { idx } else { 0 };
            if let Some(entry) = bucket.get(start) {
                return Some((h, start, entry));
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &E)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(&h, bucket)| bucket.iter().map(move |e| (h, e)))
    }

    pub fn keys(&self) -> impl Iterator<Item = Value> + '_ {
        self.iter().map(|(_, e)| e.key())
    }
}

impl<E: TableEntry> Default for HashTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl Dict {
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.iter().map(|(_, (_, v))| *v)
    }
}
