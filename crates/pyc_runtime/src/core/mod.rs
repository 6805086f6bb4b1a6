//! Object model data types.

pub mod context;
pub mod heap;
pub mod object;
pub mod table;
pub mod value;

pub use context::Context;
pub use heap::Heap;
pub use object::{
    AttrMap, BuiltinFn, Class, Entry, File, FileHandle, Function, Instance, Iter, NativeFn,
    Object, Range, Text, TypeKind, ViewKind,
};
pub use table::{Dict, HashTable, Set};
pub use value::{ContextId, Value};
