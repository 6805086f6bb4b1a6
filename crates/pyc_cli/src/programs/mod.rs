//! Programs lowered by hand onto the runtime entry points, the way the
//! code generator emits them. Each body lists the source it was lowered
//! from.

use pyc_runtime::{ContextId, RunResult, Runtime, Value};

mod classes;
mod collections;
mod memory;
mod system;

pub type ProgramFn = fn(&mut Runtime, ContextId) -> RunResult<()>;

pub struct Program {
    pub name: &'static str,
    pub about: &'static str,
    /// Slots reserved in the module context.
    pub slots: usize,
    pub run: ProgramFn,
}

pub const PROGRAMS: &[Program] = &[
    Program {
        name: "lists",
        about: "list building and len()",
        slots: 0,
        run: collections::lists,
    },
    Program {
        name: "words",
        about: "word counts through a dict",
        slots: 1,
        run: collections::words,
    },
    Program {
        name: "dict_missing",
        about: "subscript of an absent key",
        slots: 0,
        run: collections::dict_missing,
    },
    Program {
        name: "arith_error",
        about: "int + str",
        slots: 0,
        run: collections::arith_error,
    },
    Program {
        name: "classes",
        about: "user class with __init__ and a method",
        slots: 0,
        run: classes::counter,
    },
    Program {
        name: "args",
        about: "module name and command line",
        slots: 0,
        run: system::args,
    },
    Program {
        name: "files",
        about: "write a file, read it back",
        slots: 0,
        run: system::files,
    },
    Program {
        name: "gc_stress",
        about: "allocation loop with collection hooks",
        slots: 1,
        run: memory::gc_stress,
    },
];

pub fn find(name: &str) -> Option<&'static Program> {
    PROGRAMS.iter().find(|p| p.name == name)
}

/// `name(*args)` for a name visible from `ctx`.
pub(crate) fn call_name(rt: &mut Runtime, ctx: ContextId, name: &str, args: &[Value]) -> RunResult<Value> {
    let f = rt.load_name(ctx, name)?;
    rt.call_values(ctx, f, args)
}

/// `recv.name(*args)`.
pub(crate) fn call_method(
    rt: &mut Runtime,
    ctx: ContextId,
    recv: Value,
    name: &str,
    args: &[Value],
) -> RunResult<Value> {
    let m = rt.getattr(recv, name)?;
    rt.call_values(ctx, m, args)
}
