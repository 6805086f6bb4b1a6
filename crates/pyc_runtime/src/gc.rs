//! Collection hook for compiled code.
//!
//! A cycle clears every liveness bit, then marks from the permanent objects,
//! the active context (and through it the whole caller chain) and the value
//! in flight. Nothing is swept: unmarked slots are handed out again by later
//! allocations.

use crate::Runtime;
use crate::core::{ContextId, Value};
use std::time::Instant;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    pub collections: u64,
    /// Objects marked by the most recent cycle.
    pub last_marked: usize,
    pub total_marked: u64,
    /// Allocations since the last cycle.
    pub pending_allocs: usize,
}

impl Runtime {
    fn gc_roots(&self, ctx: ContextId, pending: Option<Value>) -> Vec<Value> {
        let mut roots: Vec<Value> = self.permanent_roots().collect();
        roots.push(ctx.as_value());
        roots.extend(pending);
        roots
    }

    /// Collect once the allocation counter has crossed the threshold.
    /// Returns whether a cycle ran.
    ///
    /// `ctx` is the innermost live context and `pending` a result that has
    /// not been stored anywhere yet. Values held only by native locals are
    /// not roots.
    pub fn collect_garbage(&mut self, ctx: ContextId, pending: Option<Value>) -> bool {
        if !self.heap.should_gc() {
            return false;
        }
        tracing::trace!(allocs = self.heap.alloc_count, "collection requested");
        self.collect_now(ctx, pending);
        true
    }

    /// Run a full cycle regardless of the counter.
    pub fn collect_now(&mut self, ctx: ContextId, pending: Option<Value>) {
        let started = Instant::now();
        let roots = self.gc_roots(ctx, pending);
        self.heap.begin_cycle();
        let marked = self.heap.mark_from(roots);

        self.gc_stats.collections += 1;
        self.gc_stats.last_marked = marked;
        self.gc_stats.total_marked += marked as u64;
        let stats = self.heap.stats();
        let live: Vec<usize> = stats.classes.iter().map(|c| c.live).collect();
        tracing::debug!(
            cycle = self.gc_stats.collections,
            marked,
            blocks = stats.total_blocks(),
            ?live,
            elapsed_us = started.elapsed().as_micros() as u64,
            "gc cycle"
        );
    }
}
