use super::{call_method, call_name};
use pyc_runtime::{ContextId, RunResult, Runtime};

// print(__name__, len(__args__), __args__[1:])
pub(crate) fn args(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let name = rt.load_name(ctx, "__name__")?;
    let argv = rt.load_name(ctx, "__args__")?;
    let argc = call_name(rt, ctx, "len", &[argv])?;
    let one = rt.intern_int(1)?;
    let rest = rt.slice(argv, Some(one), None, None)?;
    call_name(rt, ctx, "print", &[name, argc, rest])?;
    Ok(())
}

// path = __args__[1]
// f = open(path, 'w')
// f.write('alpha\n')
// f.write('beta\n')
// f.close()
// print(open(path).read().split())
pub(crate) fn files(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let argv = rt.load_name(ctx, "__args__")?;
    let one = rt.intern_int(1)?;
    let path = rt.getitem(argv, one)?;
    rt.store_name(ctx, "path", path);

    let mode = rt.intern_str("w")?;
    let f = call_name(rt, ctx, "open", &[path, mode])?;
    rt.store_name(ctx, "f", f);
    for line in ["alpha\n", "beta\n"] {
        let text = rt.intern_str(line)?;
        call_method(rt, ctx, f, "write", &[text])?;
    }
    call_method(rt, ctx, f, "close", &[])?;
    rt.collect_garbage(ctx, None);

    let path = rt.load_name(ctx, "path")?;
    let reader = call_name(rt, ctx, "open", &[path])?;
    let content = call_method(rt, ctx, reader, "read", &[])?;
    let words = call_method(rt, ctx, content, "split", &[])?;
    call_name(rt, ctx, "print", &[words])?;
    Ok(())
}
