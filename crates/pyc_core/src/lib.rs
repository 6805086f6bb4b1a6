//! Core building blocks of the pyc runtime.
//!
//! This crate has no knowledge of the object model:
//! - `arena` - size-classed slab arena with liveness bitmaps
//! - `ObjectId` - generation-tagged handle into the arena
//! - `hash` - FNV-1a hashing
//! - `diag` - fatal diagnostics and their one-line rendering
//! - `map` - deterministic fast hash maps

pub mod arena;
pub mod diag;
pub mod gc;
pub mod hash;
pub mod map;

pub use arena::{AllocError, Arena, ArenaConfig, ArenaStats, ClassStats};
pub use diag::{DiagnosticKind, DiagnosticsFormatter, Fatal, RunResult};
pub use gc::ObjectId;
pub use hash::fnv1a;
pub use map::{FastHashMap, FastHashSet, fast_map_new, fast_set_new};
