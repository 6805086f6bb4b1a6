use super::{call_method, call_name};
use pyc_runtime::{BinOp, ContextId, RunResult, Runtime, Value};

// def __init__(self, start):
//     self.n = start
fn counter_init(
    rt: &mut Runtime,
    _globals: ContextId,
    caller: ContextId,
    args: Value,
    _kwargs: Option<Value>,
) -> RunResult<Value> {
    let ctx = rt.new_context(Some(caller), 2)?;
    let args = rt.args_of(args);
    rt.store(ctx, 0, args[0]);
    rt.store(ctx, 1, args[1]);
    let (this, start) = (rt.load(ctx, 0)?, rt.load(ctx, 1)?);
    rt.setattr(this, "n", start)?;
    Ok(rt.none())
}

// def bump(self):
//     self.n = self.n + 1
//     return self.n
fn counter_bump(
    rt: &mut Runtime,
    _globals: ContextId,
    caller: ContextId,
    args: Value,
    _kwargs: Option<Value>,
) -> RunResult<Value> {
    let ctx = rt.new_context(Some(caller), 1)?;
    let receiver = rt.args_of(args)[0];
    rt.store(ctx, 0, receiver);
    let this = rt.load(ctx, 0)?;
    let n = rt.getattr(this, "n")?;
    let one = rt.intern_int(1)?;
    let bumped = rt.binary(BinOp::Add, n, one)?;
    rt.setattr(this, "n", bumped)?;
    rt.collect_garbage(ctx, None);
    rt.getattr(this, "n")
}

// class Counter: ...
// c = Counter(10)
// c.bump()
// print(c.bump(), type(c).__name__)
pub(crate) fn counter(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let init = rt.function_def("__init__", counter_init)?;
    let bump = rt.function_def("bump", counter_bump)?;
    let class = rt.new_class("Counter", &[("__init__", init), ("bump", bump)])?;
    rt.store_name(ctx, "Counter", class);

    let class = rt.load_name(ctx, "Counter")?;
    let ten = rt.intern_int(10)?;
    let c = rt.call_values(ctx, class, &[ten])?;
    rt.store_name(ctx, "c", c);
    call_method(rt, ctx, c, "bump", &[])?;
    rt.collect_garbage(ctx, None);

    let c = rt.load_name(ctx, "c")?;
    let n = call_method(rt, ctx, c, "bump", &[])?;
    let ty = call_name(rt, ctx, "type", &[c])?;
    let name = rt.getattr(ty, "__name__")?;
    call_name(rt, ctx, "print", &[n, name])?;
    Ok(())
}
