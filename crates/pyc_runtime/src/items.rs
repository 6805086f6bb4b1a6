//! Item protocol: subscription, item assignment, deletion and slicing.

use crate::Runtime;
use crate::containers::{SliceIndices, normalize_index, slice_positions};
use crate::core::{Object, Range, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

enum Picked {
    Value(Value),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Range(Range),
}

impl Runtime {
    fn index_arg(&self, container: Value, key: Value, op: &'static str) -> RunResult<i64> {
        self.as_int(key)
            .ok_or_else(|| self.unsupported(op, container, key))
    }

    fn slice_bound(&self, bound: Option<Value>) -> RunResult<Option<i64>> {
        match bound {
            None => Ok(None),
            Some(v) if self.is_none(v) => Ok(None),
            Some(v) => self.expect_int(v, "slice").map(Some),
        }
    }

    fn emit(&mut self, picked: Picked) -> RunResult<Value> {
        match picked {
            Picked::Value(v) => Ok(v),
            Picked::Int(n) => self.new_int(n),
            Picked::Str(s) => self.new_str(s),
            Picked::Bytes(b) => self.new_bytes(b),
            Picked::List(items) => self.new_list(items),
            Picked::Tuple(items) => self.new_tuple(items),
            Picked::Range(r) => self.new_range(r.start, r.stop, r.step),
        }
    }

    /// `container[key]`.
    pub fn getitem(&mut self, container: Value, key: Value) -> RunResult<Value> {
        let picked = match self.object(container) {
            Object::List(items) => {
                let i = normalize_index(self.index_arg(container, key, "getitem")?, items.len(), "list")?;
                Picked::Value(items[i])
            }
            Object::Tuple(items) => {
                let i = normalize_index(self.index_arg(container, key, "getitem")?, items.len(), "tuple")?;
                Picked::Value(items[i])
            }
            Object::Str(s) => {
                let len = s.value.chars().count();
                let i = normalize_index(self.index_arg(container, key, "getitem")?, len, "string")?;
                Picked::Str(s.value.chars().nth(i).map_or_else(String::new, String::from))
            }
            Object::Bytes(b) => {
                let i = normalize_index(self.index_arg(container, key, "getitem")?, b.len(), "bytes")?;
                Picked::Int(b[i] as i64)
            }
            Object::Range(r) => {
                let i = normalize_index(self.index_arg(container, key, "getitem")?, r.len(), "range object")?;
                Picked::Int(r.nth(i))
            }
            Object::Dict(_) => Picked::Value(self.dict_get(container, key)?),
            _ => return Err(self.unimplemented("getitem", container)),
        };
        self.emit(picked)
    }

    /// `container[key] = value`.
    pub fn setitem(&mut self, container: Value, key: Value, value: Value) -> RunResult<()> {
        match self.object(container) {
            Object::List(items) => {
                let i = normalize_index(self.index_arg(container, key, "setitem")?, items.len(), "list")?;
                if let Object::List(items) = self.object_mut(container) {
                    items[i] = value;
                }
                Ok(())
            }
            Object::Dict(_) => self.dict_insert(container, key, value),
            _ => Err(self.unimplemented("setitem", container)),
        }
    }

    /// `del container[key]`.
    pub fn delitem(&mut self, container: Value, key: Value) -> RunResult<()> {
        match self.object(container) {
            Object::List(items) => {
                let i = normalize_index(self.index_arg(container, key, "delitem")?, items.len(), "list")?;
                if let Object::List(items) = self.object_mut(container) {
                    items.remove(i);
                }
                Ok(())
            }
            Object::Dict(_) => match self.dict_remove(container, key)? {
                Some(_) => Ok(()),
                None => Err(self.key_not_found(key)),
            },
            _ => Err(self.unimplemented("delitem", container)),
        }
    }

    /// `container[start:stop:step]`; an absent bound is `None`.
    pub fn slice(
        &mut self,
        container: Value,
        start: Option<Value>,
        stop: Option<Value>,
        step: Option<Value>,
    ) -> RunResult<Value> {
        let (start, stop, step) = (
            self.slice_bound(start)?,
            self.slice_bound(stop)?,
            self.slice_bound(step)?,
        );
        let picked = match self.object(container) {
            Object::List(items) => Picked::List(
                slice_positions(items.len(), start, stop, step)?
                    .into_iter()
                    .map(|i| items[i])
                    .collect(),
            ),
            Object::Tuple(items) => Picked::Tuple(
                slice_positions(items.len(), start, stop, step)?
                    .into_iter()
                    .map(|i| items[i])
                    .collect(),
            ),
            Object::Str(s) => {
                let chars: Vec<char> = s.value.chars().collect();
                Picked::Str(
                    slice_positions(chars.len(), start, stop, step)?
                        .into_iter()
                        .map(|i| chars[i])
                        .collect(),
                )
            }
            Object::Bytes(b) => Picked::Bytes(
                slice_positions(b.len(), start, stop, step)?
                    .into_iter()
                    .map(|i| b[i])
                    .collect(),
            ),
            Object::Range(r) => {
                let r = *r;
                let idx = SliceIndices::new(r.len(), start, stop, step)?;
                let at = |i: i128| -> RunResult<i64> {
                    i64::try_from(r.start as i128 + r.step as i128 * i)
                        .map_err(|_| Fatal::new(DiagnosticKind::IntegerOverflow("slice")))
                };
                let new_step = i64::try_from(r.step as i128 * idx.step)
                    .map_err(|_| Fatal::new(DiagnosticKind::IntegerOverflow("slice")))?;
                let sliced = if idx.count == 0 {
                    Range { start: r.start, stop: r.start, step: new_step }
                } else {
                    // a stop past the i64 range is replaced by one just beyond the last element
                    let last = idx.start + idx.step * (idx.count as i128 - 1);
                    let stop = match at(idx.stop) {
                        Ok(stop) => stop,
                        Err(_) => at(last)?
                            .checked_add(new_step.signum())
                            .ok_or(Fatal::new(DiagnosticKind::IntegerOverflow("slice")))?,
                    };
                    Range { start: at(idx.start)?, stop, step: new_step }
                };
                Picked::Range(sliced)
            }
            _ => return Err(self.unimplemented("slice", container)),
        };
        self.emit(picked)
    }
}
