//! Execution context storage.

use super::value::{ContextId, Value};
use pyc_core::map::{FastHashMap, FastHashSet, fast_map_new, fast_set_new};

/// Variable storage for one activation.
///
/// Slots are resolved by index at compile time. Names are the slow path used
/// for class bodies and builtins; a name listed in `globals` always resolves
/// in the outermost context instead.
pub struct Context {
    pub(crate) slots: Vec<Option<Value>>,
    pub(crate) names: FastHashMap<Box<str>, Value>,
    pub(crate) globals: FastHashSet<Box<str>>,
    pub(crate) parent: Option<ContextId>,
}

impl Context {
    pub fn new(parent: Option<ContextId>, n_slots: usize) -> Self {
        Self {
            slots: vec![None; n_slots],
            names: fast_map_new(),
            globals: fast_set_new(),
            parent,
        }
    }

    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    pub(crate) fn trace(&self, out: &mut Vec<Value>) {
        out.extend(self.slots.iter().flatten().copied());
        out.extend(self.names.values().copied());
        if let Some(parent) = self.parent {
            out.push(parent.as_value());
        }
    }
}
