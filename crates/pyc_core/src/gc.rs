//! Garbage collection infrastructure - base types.

use std::fmt;

/// Index of the large-object pool inside the arena.
pub const LARGE_CLASS: u8 = 7;

/// Handle to an arena-allocated object.
///
/// A handle names a slot by its size class, block index and slot index.
/// The generation is bumped every time the slot is handed out again, so a
/// handle that outlived its object can be told apart from the new occupant.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) block: u32,
    pub(crate) generation: u32,
    pub(crate) slot: u16,
    pub(crate) class: u8,
}

impl ObjectId {
    /// Size-class index (0..=6 for slab classes, [`LARGE_CLASS`] for the large pool).
    #[inline]
    pub fn class(self) -> u8 {
        self.class
    }

    #[inline]
    pub fn block(self) -> u32 {
        self.block
    }

    #[inline]
    pub fn slot(self) -> u16 {
        self.slot
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    pub fn is_large(self) -> bool {
        self.class == LARGE_CLASS
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ObjectId(c{}:b{}:s{}@g{})",
            self.class, self.block, self.slot, self.generation
        )
    }
}
