//! Context storage: slot access by index and name resolution through the
//! parent chain.

use crate::Runtime;
use crate::core::context::Context;
use crate::core::{ContextId, Object, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

impl Runtime {
    /// Context for one activation, chained to the caller's.
    pub fn new_context(&mut self, parent: Option<ContextId>, n_slots: usize) -> RunResult<ContextId> {
        let v = self.alloc(Object::Context(Context::new(parent, n_slots)))?;
        Ok(ContextId(v))
    }

    pub(crate) fn context(&self, ctx: ContextId) -> &Context {
        match self.object(ctx.as_value()) {
            Object::Context(c) => c,
            _ => panic!("not a context: {ctx:?}"),
        }
    }

    fn context_mut(&mut self, ctx: ContextId) -> &mut Context {
        match self.object_mut(ctx.as_value()) {
            Object::Context(c) => c,
            _ => panic!("not a context: {ctx:?}"),
        }
    }

    pub fn parent_context(&self, ctx: ContextId) -> Option<ContextId> {
        self.context(ctx).parent()
    }

    pub fn store(&mut self, ctx: ContextId, idx: usize, v: Value) {
        let slots = &mut self.context_mut(ctx).slots;
        if idx >= slots.len() {
            slots.resize(idx + 1, None);
        }
        slots[idx] = Some(v);
    }

    /// Value in slot `idx`; an unset slot is fatal.
    pub fn load(&self, ctx: ContextId, idx: usize) -> RunResult<Value> {
        self.context(ctx)
            .slots
            .get(idx)
            .copied()
            .flatten()
            .ok_or(Fatal::new(DiagnosticKind::SlotNotDefined(idx)))
    }

    /// Outermost context of the chain starting at `ctx`.
    fn outermost(&self, ctx: ContextId) -> ContextId {
        if let Some(globals) = self.globals {
            return globals;
        }
        let mut cur = ctx;
        while let Some(parent) = self.context(cur).parent() {
            cur = parent;
        }
        cur
    }

    /// Mark `name` as global in `ctx`: later loads and stores through `ctx`
    /// go to the outermost context.
    pub fn declare_global(&mut self, ctx: ContextId, name: &str) {
        self.context_mut(ctx).globals.insert(name.into());
    }

    pub fn store_name(&mut self, ctx: ContextId, name: &str, v: Value) {
        let target = if self.context(ctx).globals.contains(name) {
            self.outermost(ctx)
        } else {
            ctx
        };
        self.context_mut(target).names.insert(name.into(), v);
    }

    /// Resolve `name` from `ctx` outwards.
    pub fn load_name(&self, ctx: ContextId, name: &str) -> RunResult<Value> {
        let start = if self.context(ctx).globals.contains(name) {
            self.outermost(ctx)
        } else {
            ctx
        };
        let mut cur = Some(start);
        while let Some(c) = cur {
            let context = self.context(c);
            if let Some(&v) = context.names.get(name) {
                return Ok(v);
            }
            cur = context.parent();
        }
        Err(Fatal::new(DiagnosticKind::NameNotDefined(name.to_string())))
    }
}
