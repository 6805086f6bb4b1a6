//! Arena-backed object heap and the marking half of the collector.

use super::object::Object;
use super::value::Value;
use pyc_core::arena::{Arena, ArenaConfig, ArenaStats};
use pyc_core::{AllocError, RunResult};

pub struct Heap {
    arena: Arena<Object>,
    pub(crate) alloc_count: usize,
    pub(crate) gc_threshold: usize,
}

impl Heap {
    pub fn new(config: ArenaConfig, gc_threshold: usize) -> Result<Self, AllocError> {
        Ok(Self {
            arena: Arena::with_config(config)?,
            alloc_count: 0,
            gc_threshold: gc_threshold.max(1),
        })
    }

    /// Place `obj` in the arena slot class matching its footprint.
    pub fn alloc(&mut self, obj: Object) -> RunResult<Value> {
        let size = obj.footprint();
        let id = self.arena.allocate(size, obj)?;
        self.alloc_count += 1;
        Ok(Value(id))
    }

    #[inline]
    pub fn should_gc(&self) -> bool {
        self.alloc_count >= self.gc_threshold
    }

    pub fn get(&self, v: Value) -> &Object {
        self.arena.get(v.0)
    }

    pub fn get_mut(&mut self, v: Value) -> &mut Object {
        self.arena.get_mut(v.0)
    }

    /// Whether `v` still names the object it was created for.
    pub fn is_valid(&self, v: Value) -> bool {
        self.arena.try_get(v.0).is_some()
    }

    /// Clear every liveness bit. Starts a collection cycle.
    pub fn begin_cycle(&mut self) {
        self.arena.mark_dead();
        self.alloc_count = 0;
    }

    /// Mark everything reachable from `roots`, returning how many objects
    /// were newly marked. Objects already marked this cycle are not traced
    /// again, so shared children are visited once.
    pub fn mark_from(&mut self, roots: impl IntoIterator<Item = Value>) -> usize {
        let mut pending: Vec<Value> = roots.into_iter().collect();
        let mut traced = 0;
        while let Some(v) = pending.pop() {
            if self.arena.mark_live(v.0) {
                continue;
            }
            traced += 1;
            self.arena.get(v.0).trace(&mut pending);
        }
        traced
    }

    pub fn stats(&self) -> ArenaStats {
        self.arena.stats()
    }
}
