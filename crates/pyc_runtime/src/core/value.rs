//! Value handles.

use pyc_core::ObjectId;
use std::fmt;

/// Universal handle to a runtime object.
///
/// Every value, integers included, lives in the arena. Two handles are
/// identical (`is`) exactly when they name the same slot and generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value(pub(crate) ObjectId);

impl Value {
    #[inline]
    pub fn id(self) -> ObjectId {
        self.0
    }

    /// Identity comparison.
    #[inline]
    pub fn is(self, other: Value) -> bool {
        self.0 == other.0
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({:?})", self.0)
    }
}

/// Handle to an execution context.
///
/// Contexts are arena objects like any other value, so a context nobody can
/// reach any more is reclaimed by the next collection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ContextId(pub(crate) Value);

impl ContextId {
    #[inline]
    pub fn as_value(self) -> Value {
        self.0
    }
}
