//! Dict and Set storage operations, and sequence index normalization.

use crate::Runtime;
use crate::core::{Dict, Object, Set, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

impl Runtime {
    pub(crate) fn dict_ref(&self, dict: Value) -> &Dict {
        match self.object(dict) {
            Object::Dict(d) => d,
            _ => panic!("not a dict: {dict:?}"),
        }
    }

    pub(crate) fn dict_mut(&mut self, dict: Value) -> &mut Dict {
        match self.object_mut(dict) {
            Object::Dict(d) => d,
            _ => panic!("not a dict: {dict:?}"),
        }
    }

    pub(crate) fn set_ref(&self, set: Value) -> &Set {
        match self.object(set) {
            Object::Set(s) => s,
            _ => panic!("not a set: {set:?}"),
        }
    }

    pub(crate) fn set_mut(&mut self, set: Value) -> &mut Set {
        match self.object_mut(set) {
            Object::Set(s) => s,
            _ => panic!("not a set: {set:?}"),
        }
    }

    fn dict_position(&self, dict: Value, hash: u64, key: Value) -> Option<usize> {
        self.dict_ref(dict)
            .bucket(hash)
            .iter()
            .position(|(k, _)| self.values_equal(*k, key))
    }

    fn set_position(&self, set: Value, hash: u64, key: Value) -> Option<usize> {
        self.set_ref(set)
            .bucket(hash)
            .iter()
            .position(|k| self.values_equal(*k, key))
    }

    /// Value stored under a key equal to `key`.
    pub fn dict_lookup(&self, dict: Value, key: Value) -> RunResult<Option<Value>> {
        let hash = self.hash_of(key)?;
        Ok(self
            .dict_ref(dict)
            .bucket(hash)
            .iter()
            .find(|(k, _)| self.values_equal(*k, key))
            .map(|(_, v)| *v))
    }

    /// Like [`Runtime::dict_lookup`], but a missing key is fatal.
    pub fn dict_get(&self, dict: Value, key: Value) -> RunResult<Value> {
        match self.dict_lookup(dict, key)? {
            Some(v) => Ok(v),
            None => Err(self.key_not_found(key)),
        }
    }

    pub(crate) fn key_not_found(&self, key: Value) -> Fatal {
        Fatal::new(DiagnosticKind::KeyNotFound(self.repr(key)))
    }

    pub fn dict_insert(&mut self, dict: Value, key: Value, value: Value) -> RunResult<()> {
        let hash = self.hash_of(key)?;
        match self.dict_position(dict, hash, key) {
            Some(idx) => {
                if let Some(entry) = self.dict_mut(dict).entry_mut(hash, idx) {
                    entry.1 = value;
                }
            }
            None => self.dict_mut(dict).push(hash, (key, value)),
        }
        Ok(())
    }

    pub fn dict_remove(&mut self, dict: Value, key: Value) -> RunResult<Option<Value>> {
        let hash = self.hash_of(key)?;
        Ok(match self.dict_position(dict, hash, key) {
            Some(idx) => self.dict_mut(dict).remove(hash, idx).map(|(_, v)| v),
            None => None,
        })
    }

    pub fn set_contains(&self, set: Value, key: Value) -> RunResult<bool> {
        let hash = self.hash_of(key)?;
        Ok(self.set_position(set, hash, key).is_some())
    }

    /// Insert `key`, returning whether it was absent.
    pub fn set_insert(&mut self, set: Value, key: Value) -> RunResult<bool> {
        let hash = self.hash_of(key)?;
        if self.set_position(set, hash, key).is_some() {
            return Ok(false);
        }
        self.set_mut(set).push(hash, key);
        Ok(true)
    }

    /// Remove `key`, returning whether it was present.
    pub fn set_remove(&mut self, set: Value, key: Value) -> RunResult<bool> {
        let hash = self.hash_of(key)?;
        Ok(match self.set_position(set, hash, key) {
            Some(idx) => self.set_mut(set).remove(hash, idx).is_some(),
            None => false,
        })
    }

    pub(crate) fn set_keys(&self, set: Value) -> Vec<Value> {
        self.set_ref(set).keys().collect()
    }

    /// Merge `source` into `dict`: either another dict or an iterable of
    /// two-element sequences.
    pub fn dict_update(&mut self, dict: Value, source: Value) -> RunResult<()> {
        let pairs = if self.is_dict(source) {
            self.dict_pairs(source)
        } else {
            let items = self.collect_iter(source)?;
            let mut pairs = Vec::with_capacity(items.len());
            for item in items {
                match self.as_seq(item) {
                    Some(&[k, v]) => pairs.push((k, v)),
                    _ => {
                        return Err(Fatal::new(DiagnosticKind::InvalidValue(format!(
                            "dictionary update sequence element {} is not a pair",
                            self.repr(item)
                        ))));
                    }
                }
            }
            pairs
        };
        for (k, v) in pairs {
            self.dict_insert(dict, k, v)?;
        }
        Ok(())
    }

    pub(crate) fn dict_pairs(&self, dict: Value) -> Vec<(Value, Value)> {
        self.dict_ref(dict).iter().map(|(_, e)| *e).collect()
    }
}

/// Resolve a possibly negative index against `len`.
pub(crate) fn normalize_index(idx: i64, len: usize, ty: &str) -> RunResult<usize> {
    let len = len as i128;
    let idx = idx as i128;
    let resolved = if idx < 0 { idx + len } else { idx };
    if resolved < 0 || resolved >= len {
        return Err(Fatal::new(DiagnosticKind::IndexOutOfRange(ty.to_string())));
    }
    Ok(resolved as usize)
}

/// Clamped `[start:stop:step]` over a sequence of `len`, with the number of
/// positions it selects. Indices are kept in `i128` so no step overflows.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SliceIndices {
    pub start: i128,
    pub stop: i128,
    pub step: i128,
    pub count: usize,
}

impl SliceIndices {
    pub fn new(len: usize, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> RunResult<Self> {
        let step = step.unwrap_or(1) as i128;
        if step == 0 {
            return Err(Fatal::new(DiagnosticKind::InvalidValue(
                "slice step cannot be zero".into(),
            )));
        }
        let len = len as i128;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: i64| {
            let bound = bound as i128;
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = start.map_or(if step > 0 { lower } else { upper }, clamp);
        let stop = stop.map_or(if step > 0 { upper } else { lower }, clamp);
        let count = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) / -step + 1
        } else {
            0
        };
        Ok(SliceIndices { start, stop, step, count: count as usize })
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + use<> {
        let SliceIndices { start, step, count, .. } = *self;
        (0..count).map(move |k| (start + step * k as i128) as usize)
    }
}

/// Positions selected by `[start:stop:step]` over a sequence of `len`.
pub(crate) fn slice_positions(
    len: usize,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> RunResult<Vec<usize>> {
    Ok(SliceIndices::new(len, start, stop, step)?.positions().collect())
}
