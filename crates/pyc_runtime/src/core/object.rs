//! The closed set of runtime object variants.

use super::context::Context;
use super::table::{Dict, Set};
use super::value::{ContextId, Value};
use crate::Runtime;
use crate::methods::MethodKind;
use ahash::RandomState;
use indexmap::IndexMap;
use pyc_core::RunResult;
use pyc_core::map::fast_hasher;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::mem::size_of;

/// Calling convention of compiled functions:
/// `(globals, caller, positional args tuple, keyword args dict)`.
pub type NativeFn = fn(&mut Runtime, ContextId, ContextId, Value, Option<Value>) -> RunResult<Value>;

/// Builtin functions receive their positional arguments unpacked.
pub type BuiltinFn = fn(&mut Runtime, &[Value], Option<Value>) -> RunResult<Value>;

pub type AttrMap = IndexMap<Box<str>, Value, RandomState>;

pub fn attr_map_new() -> AttrMap {
    IndexMap::with_hasher(fast_hasher())
}

pub enum Object {
    None,
    Bool(bool),
    Int(i64),
    Str(Text),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Box<[Value]>),
    Dict(Box<Dict>),
    Set(Box<Set>),
    Instance(Box<Instance>),
    Class(Box<Class>),
    BoundMethod { receiver: Value, func: Value },
    Function(Function),
    File(Box<File>),
    Iter(Box<Iter>),
    Range(Range),
    View { dict: Value, kind: ViewKind },
    Type(TypeKind),
    Context(Context),
}

/// Immutable string; interned constants carry their hash.
pub struct Text {
    pub value: Box<str>,
    pub hash: Option<u64>,
}

impl Text {
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self {
            value: value.into(),
            hash: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

pub struct Function {
    pub name: Box<str>,
    pub entry: Entry,
}

#[derive(Clone, Copy)]
pub enum Entry {
    Compiled(NativeFn),
    Builtin {
        fun: BuiltinFn,
        keywords: &'static [&'static str],
    },
    /// Per-variant method; the receiver is the first positional argument.
    Method(MethodKind),
}

pub struct Class {
    pub name: Box<str>,
    pub members: AttrMap,
}

pub struct Instance {
    pub class: Value,
    pub attrs: AttrMap,
}

pub struct File {
    pub path: Box<str>,
    pub binary: bool,
    pub handle: FileHandle,
}

pub enum FileHandle {
    Reader(BufReader<fs::File>),
    Writer(BufWriter<fs::File>),
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    pub fn len(&self) -> usize {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let n = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        };
        n as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `idx`, which must be below `len()`.
    pub fn nth(&self, idx: usize) -> i64 {
        (self.start as i128 + self.step as i128 * idx as i128) as i64
    }

    pub fn contains(&self, n: i64) -> bool {
        let len = self.len();
        if len == 0 {
            return false;
        }
        let offset = n as i128 - self.start as i128;
        if offset % self.step as i128 != 0 {
            return false;
        }
        let idx = offset / self.step as i128;
        idx >= 0 && (idx as usize) < len
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Keys,
    Values,
    Items,
}

/// Single-pass cursors. `next` yields `None` once exhausted.
#[derive(Clone, Copy, Debug)]
pub enum Iter {
    Seq { seq: Value, ty: TypeKind, pos: usize },
    Reversed { seq: Value, pos: usize },
    Range { next: i64, step: i64, remaining: usize },
    DictView { dict: Value, kind: ViewKind, hash: u64, idx: usize, done: bool },
    Set { set: Value, hash: u64, idx: usize, done: bool },
    Enumerate { inner: Value, count: i64 },
    Zip { left: Value, right: Value },
}

/// Builtin and hidden classes, each backed by one type object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    NoneType,
    Bool,
    Int,
    Str,
    Bytes,
    List,
    Tuple,
    Dict,
    Set,
    Range,
    Enumerate,
    Reversed,
    Zip,
    Type,
    Function,
    BuiltinFunction,
    MethodDescriptor,
    Method,
    File,
    DictKeys,
    DictValues,
    DictItems,
    ListIter,
    TupleIter,
    StrIter,
    BytesIter,
    RangeIter,
    DictKeyIter,
    DictValueIter,
    DictItemIter,
    SetIter,
}

impl TypeKind {
    pub const ALL: [TypeKind; 31] = [
        TypeKind::NoneType,
        TypeKind::Bool,
        TypeKind::Int,
        TypeKind::Str,
        TypeKind::Bytes,
        TypeKind::List,
        TypeKind::Tuple,
        TypeKind::Dict,
        TypeKind::Set,
        TypeKind::Range,
        TypeKind::Enumerate,
        TypeKind::Reversed,
        TypeKind::Zip,
        TypeKind::Type,
        TypeKind::Function,
        TypeKind::BuiltinFunction,
        TypeKind::MethodDescriptor,
        TypeKind::Method,
        TypeKind::File,
        TypeKind::DictKeys,
        TypeKind::DictValues,
        TypeKind::DictItems,
        TypeKind::ListIter,
        TypeKind::TupleIter,
        TypeKind::StrIter,
        TypeKind::BytesIter,
        TypeKind::RangeIter,
        TypeKind::DictKeyIter,
        TypeKind::DictValueIter,
        TypeKind::DictItemIter,
        TypeKind::SetIter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeKind::NoneType => "NoneType",
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Str => "str",
            TypeKind::Bytes => "bytes",
            TypeKind::List => "list",
            TypeKind::Tuple => "tuple",
            TypeKind::Dict => "dict",
            TypeKind::Set => "set",
            TypeKind::Range => "range",
            TypeKind::Enumerate => "enumerate",
            TypeKind::Reversed => "reversed",
            TypeKind::Zip => "zip",
            TypeKind::Type => "type",
            TypeKind::Function => "function",
            TypeKind::BuiltinFunction => "builtin_function_or_method",
            TypeKind::MethodDescriptor => "method_descriptor",
            TypeKind::Method => "method",
            TypeKind::File => "file",
            TypeKind::DictKeys => "dict_keys",
            TypeKind::DictValues => "dict_values",
            TypeKind::DictItems => "dict_items",
            TypeKind::ListIter => "list_iterator",
            TypeKind::TupleIter => "tuple_iterator",
            TypeKind::StrIter => "str_iterator",
            TypeKind::BytesIter => "bytes_iterator",
            TypeKind::RangeIter => "range_iterator",
            TypeKind::DictKeyIter => "dict_keyiterator",
            TypeKind::DictValueIter => "dict_valueiterator",
            TypeKind::DictItemIter => "dict_itemiterator",
            TypeKind::SetIter => "set_iterator",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Object {
    /// Bytes this object occupies in the arena: a header word plus payload.
    pub fn footprint(&self) -> usize {
        let payload = match self {
            Object::None => 0,
            Object::Bool(_) => size_of::<bool>(),
            Object::Int(_) => size_of::<i64>(),
            Object::Str(_) => size_of::<Text>(),
            Object::Bytes(_) => size_of::<Vec<u8>>(),
            Object::List(_) => size_of::<Vec<Value>>(),
            Object::Tuple(_) => size_of::<Box<[Value]>>(),
            Object::Dict(_) => size_of::<Box<Dict>>(),
            Object::Set(_) => size_of::<Box<Set>>(),
            Object::Instance(_) => size_of::<Box<Instance>>(),
            Object::Class(_) => size_of::<Box<Class>>(),
            Object::BoundMethod { .. } => 2 * size_of::<Value>(),
            Object::Function(_) => size_of::<Function>(),
            Object::File(_) => size_of::<Box<File>>(),
            Object::Iter(_) => size_of::<Box<Iter>>(),
            Object::Range(_) => size_of::<Range>(),
            Object::View { .. } => size_of::<Value>() + size_of::<ViewKind>(),
            Object::Type(_) => size_of::<TypeKind>(),
            Object::Context(_) => size_of::<Context>(),
        };
        8 + payload
    }

    /// The builtin type of this object; `None` for user instances and contexts.
    pub fn kind(&self) -> Option<TypeKind> {
        Some(match self {
            Object::None => TypeKind::NoneType,
            Object::Bool(_) => TypeKind::Bool,
            Object::Int(_) => TypeKind::Int,
            Object::Str(_) => TypeKind::Str,
            Object::Bytes(_) => TypeKind::Bytes,
            Object::List(_) => TypeKind::List,
            Object::Tuple(_) => TypeKind::Tuple,
            Object::Dict(_) => TypeKind::Dict,
            Object::Set(_) => TypeKind::Set,
            Object::Class(_) | Object::Type(_) => TypeKind::Type,
            Object::BoundMethod { .. } => TypeKind::Method,
            Object::Function(f) => match f.entry {
                Entry::Compiled(_) => TypeKind::Function,
                Entry::Builtin { .. } => TypeKind::BuiltinFunction,
                Entry::Method(_) => TypeKind::MethodDescriptor,
            },
            Object::File(_) => TypeKind::File,
            Object::Range(_) => TypeKind::Range,
            Object::View { kind, .. } => match kind {
                ViewKind::Keys => TypeKind::DictKeys,
                ViewKind::Values => TypeKind::DictValues,
                ViewKind::Items => TypeKind::DictItems,
            },
            Object::Iter(it) => match it.as_ref() {
                Iter::Seq { ty, .. } => *ty,
                Iter::Reversed { .. } => TypeKind::Reversed,
                Iter::Range { .. } => TypeKind::RangeIter,
                Iter::DictView { kind, .. } => match kind {
                    ViewKind::Keys => TypeKind::DictKeyIter,
                    ViewKind::Values => TypeKind::DictValueIter,
                    ViewKind::Items => TypeKind::DictItemIter,
                },
                Iter::Set { .. } => TypeKind::SetIter,
                Iter::Enumerate { .. } => TypeKind::Enumerate,
                Iter::Zip { .. } => TypeKind::Zip,
            },
            Object::Instance(_) | Object::Context(_) => return None,
        })
    }

    /// Push every value this object keeps alive.
    pub fn trace(&self, out: &mut Vec<Value>) {
        match self {
            Object::None
            | Object::Bool(_)
            | Object::Int(_)
            | Object::Str(_)
            | Object::Bytes(_)
            | Object::Function(_)
            | Object::File(_)
            | Object::Range(_)
            | Object::Type(_) => {}
            Object::List(items) => out.extend_from_slice(items),
            Object::Tuple(items) => out.extend_from_slice(items),
            Object::Dict(d) => {
                for (_, (k, v)) in d.iter() {
                    out.push(*k);
                    out.push(*v);
                }
            }
            Object::Set(s) => out.extend(s.keys()),
            Object::Instance(inst) => {
                out.push(inst.class);
                out.extend(inst.attrs.values().copied());
            }
            Object::Class(class) => out.extend(class.members.values().copied()),
            Object::BoundMethod { receiver, func } => {
                out.push(*receiver);
                out.push(*func);
            }
            Object::Iter(it) => match it.as_ref() {
                Iter::Seq { seq, .. } | Iter::Reversed { seq, .. } => out.push(*seq),
                Iter::Range { .. } => {}
                Iter::DictView { dict, .. } => out.push(*dict),
                Iter::Set { set, .. } => out.push(*set),
                Iter::Enumerate { inner, .. } => out.push(*inner),
                Iter::Zip { left, right } => {
                    out.push(*left);
                    out.push(*right);
                }
            },
            Object::View { dict, .. } => out.push(*dict),
            Object::Context(ctx) => ctx.trace(out),
        }
    }
}
