//! Iteration protocol.

use crate::Runtime;
use crate::core::{Iter, Object, TypeKind, Value, ViewKind};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

enum Yielded {
    Value(Value),
    Int(i64),
    Str(String),
    Pair(Value, Value),
    Numbered(i64, Value),
}

impl Runtime {
    /// `iter(v)`: a fresh cursor over `v`, or `v` itself if it already is one.
    pub fn iter(&mut self, v: Value) -> RunResult<Value> {
        let it = match self.object(v) {
            Object::List(_) => Iter::Seq { seq: v, ty: TypeKind::ListIter, pos: 0 },
            Object::Tuple(_) => Iter::Seq { seq: v, ty: TypeKind::TupleIter, pos: 0 },
            Object::Str(_) => Iter::Seq { seq: v, ty: TypeKind::StrIter, pos: 0 },
            Object::Bytes(_) => Iter::Seq { seq: v, ty: TypeKind::BytesIter, pos: 0 },
            Object::Range(r) => Iter::Range {
                next: r.start,
                step: r.step,
                remaining: r.len(),
            },
            Object::Dict(_) => Iter::DictView {
                dict: v,
                kind: ViewKind::Keys,
                hash: 0,
                idx: 0,
                done: false,
            },
            Object::View { dict, kind } => Iter::DictView {
                dict: *dict,
                kind: *kind,
                hash: 0,
                idx: 0,
                done: false,
            },
            Object::Set(_) => Iter::Set {
                set: v,
                hash: 0,
                idx: 0,
                done: false,
            },
            Object::Iter(_) => return Ok(v),
            _ => return Err(Fatal::new(DiagnosticKind::NotIterable(self.type_name(v)))),
        };
        self.new_iter(it)
    }

    /// Cursor running backwards over a sequence.
    pub(crate) fn reversed(&mut self, v: Value) -> RunResult<Value> {
        let it = match self.object(v) {
            Object::List(items) => Iter::Reversed { seq: v, pos: items.len() },
            Object::Tuple(items) => Iter::Reversed { seq: v, pos: items.len() },
            Object::Str(s) => Iter::Reversed { seq: v, pos: s.value.len() },
            Object::Bytes(b) => Iter::Reversed { seq: v, pos: b.len() },
            Object::Range(r) => {
                let len = r.len();
                Iter::Range {
                    next: if len == 0 { r.start } else { r.nth(len - 1) },
                    step: r.step.wrapping_neg(),
                    remaining: len,
                }
            }
            _ => return Err(Fatal::new(DiagnosticKind::NotIterable(self.type_name(v)))),
        };
        self.new_iter(it)
    }

    /// Advance `it`; `None` once it is exhausted.
    pub fn next(&mut self, it: Value) -> RunResult<Option<Value>> {
        let state = match self.object(it) {
            Object::Iter(state) => **state,
            _ => return Err(self.unimplemented("next", it)),
        };
        let (yielded, state) = match state {
            Iter::Seq { seq, ty, pos } => {
                let step = match self.object(seq) {
                    Object::List(items) => items.get(pos).map(|v| (Yielded::Value(*v), pos + 1)),
                    Object::Tuple(items) => items.get(pos).map(|v| (Yielded::Value(*v), pos + 1)),
                    Object::Str(s) => s.value[pos..]
                        .chars()
                        .next()
                        .map(|c| (Yielded::Str(c.to_string()), pos + c.len_utf8())),
                    Object::Bytes(b) => b.get(pos).map(|&x| (Yielded::Int(x as i64), pos + 1)),
                    _ => None,
                };
                match step {
                    Some((y, pos)) => (Some(y), Iter::Seq { seq, ty, pos }),
                    None => (None, state),
                }
            }
            Iter::Reversed { seq, pos } => {
                let step = match self.object(seq) {
                    Object::List(items) => {
                        let pos = pos.min(items.len());
                        pos.checked_sub(1).map(|p| (Yielded::Value(items[p]), p))
                    }
                    Object::Tuple(items) => {
                        let pos = pos.min(items.len());
                        pos.checked_sub(1).map(|p| (Yielded::Value(items[p]), p))
                    }
                    Object::Str(s) => s.value[..pos]
                        .chars()
                        .next_back()
                        .map(|c| (Yielded::Str(c.to_string()), pos - c.len_utf8())),
                    Object::Bytes(b) => {
                        let pos = pos.min(b.len());
                        pos.checked_sub(1).map(|p| (Yielded::Int(b[p] as i64), p))
                    }
                    _ => None,
                };
                match step {
                    Some((y, pos)) => (Some(y), Iter::Reversed { seq, pos }),
                    None => (None, Iter::Reversed { seq, pos: 0 }),
                }
            }
            Iter::Range { next, step, remaining } => {
                if remaining == 0 {
                    (None, state)
                } else {
                    let advanced = Iter::Range {
                        next: next.wrapping_add(step),
                        step,
                        remaining: remaining - 1,
                    };
                    (Some(Yielded::Int(next)), advanced)
                }
            }
            Iter::DictView { dict, kind, hash, idx, done } => {
                let found = if done {
                    None
                } else {
                    self.dict_ref(dict).next_from(hash, idx).map(|(h, i, &(k, v))| {
                        let y = match kind {
                            ViewKind::Keys => Yielded::Value(k),
                            ViewKind::Values => Yielded::Value(v),
                            ViewKind::Items => Yielded::Pair(k, v),
                        };
                        (y, h, i + 1)
                    })
                };
                match found {
                    Some((y, hash, idx)) => (Some(y), Iter::DictView { dict, kind, hash, idx, done }),
                    None => (None, Iter::DictView { dict, kind, hash, idx, done: true }),
                }
            }
            Iter::Set { set, hash, idx, done } => {
                let found = if done {
                    None
                } else {
                    self.set_ref(set)
                        .next_from(hash, idx)
                        .map(|(h, i, &k)| (Yielded::Value(k), h, i + 1))
                };
                match found {
                    Some((y, hash, idx)) => (Some(y), Iter::Set { set, hash, idx, done }),
                    None => (None, Iter::Set { set, hash, idx, done: true }),
                }
            }
            Iter::Enumerate { inner, count } => match self.next(inner)? {
                Some(v) => (
                    Some(Yielded::Numbered(count, v)),
                    Iter::Enumerate { inner, count: count.saturating_add(1) },
                ),
                None => (None, state),
            },
            Iter::Zip { left, right } => {
                let pair = match self.next(left)? {
                    Some(a) => self.next(right)?.map(|b| Yielded::Pair(a, b)),
                    None => None,
                };
                (pair, state)
            }
        };
        if let Object::Iter(slot) = self.object_mut(it) {
            **slot = state;
        }
        let Some(yielded) = yielded else {
            return Ok(None);
        };
        let v = match yielded {
            Yielded::Value(v) => v,
            Yielded::Int(n) => self.new_int(n)?,
            Yielded::Str(s) => self.new_str(s)?,
            Yielded::Pair(a, b) => self.new_tuple(vec![a, b])?,
            Yielded::Numbered(n, v) => {
                let n = self.new_int(n)?;
                self.new_tuple(vec![n, v])?
            }
        };
        Ok(Some(v))
    }

    /// Drain any iterable into a vector.
    pub fn collect_iter(&mut self, v: Value) -> RunResult<Vec<Value>> {
        match self.object(v) {
            Object::List(items) => return Ok(items.clone()),
            Object::Tuple(items) => return Ok(items.to_vec()),
            Object::Set(s) => return Ok(s.keys().collect()),
            _ => {}
        }
        let it = self.iter(v)?;
        let mut out = Vec::new();
        while let Some(item) = self.next(it)? {
            out.push(item);
        }
        Ok(out)
    }
}
