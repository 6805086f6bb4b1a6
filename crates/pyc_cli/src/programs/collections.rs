use super::{call_method, call_name};
use pyc_runtime::{BinOp, ContextId, RunResult, Runtime};

// xs = [1, 2, 3]
// xs.append(4)
// print(len(xs))
pub(crate) fn lists(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let items = vec![rt.intern_int(1)?, rt.intern_int(2)?, rt.intern_int(3)?];
    let xs = rt.new_list(items)?;
    rt.store_name(ctx, "xs", xs);
    let xs = rt.load_name(ctx, "xs")?;
    let four = rt.intern_int(4)?;
    call_method(rt, ctx, xs, "append", &[four])?;
    let xs = rt.load_name(ctx, "xs")?;
    let n = call_name(rt, ctx, "len", &[xs])?;
    call_name(rt, ctx, "print", &[n])?;
    Ok(())
}

// counts = {}
// for w in "the cat and the hat and the bat".split():
//     counts[w] = counts.get(w, 0) + 1
// for k, v in sorted(counts.items()):
//     print("%s=%d" % (k, v))
pub(crate) fn words(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let counts = rt.new_dict()?;
    rt.store_name(ctx, "counts", counts);

    let text = rt.intern_str("the cat and the hat and the bat")?;
    let split = call_method(rt, ctx, text, "split", &[])?;
    let it = rt.iter(split)?;
    rt.store(ctx, 0, it);
    loop {
        let it = rt.load(ctx, 0)?;
        let Some(w) = rt.next(it)? else { break };
        rt.store_name(ctx, "w", w);
        let counts = rt.load_name(ctx, "counts")?;
        let zero = rt.intern_int(0)?;
        let current = call_method(rt, ctx, counts, "get", &[w, zero])?;
        let one = rt.intern_int(1)?;
        let bumped = rt.binary(BinOp::Add, current, one)?;
        rt.setitem(counts, w, bumped)?;
        rt.collect_garbage(ctx, None);
    }

    let counts = rt.load_name(ctx, "counts")?;
    let items = call_method(rt, ctx, counts, "items", &[])?;
    let ordered = call_name(rt, ctx, "sorted", &[items])?;
    let it = rt.iter(ordered)?;
    rt.store(ctx, 0, it);
    let fmt = rt.intern_str("%s=%d")?;
    let (first, second) = (rt.intern_int(0)?, rt.intern_int(1)?);
    loop {
        let it = rt.load(ctx, 0)?;
        let Some(pair) = rt.next(it)? else { break };
        let k = rt.getitem(pair, first)?;
        rt.store_name(ctx, "k", k);
        let v = rt.getitem(pair, second)?;
        rt.store_name(ctx, "v", v);
        let args = rt.new_tuple(vec![k, v])?;
        let line = rt.binary(BinOp::Mod, fmt, args)?;
        call_name(rt, ctx, "print", &[line])?;
        rt.collect_garbage(ctx, None);
    }
    Ok(())
}

// d = {}
// d["a"] = 1
// print(d["b"])
pub(crate) fn dict_missing(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let d = rt.new_dict()?;
    rt.store_name(ctx, "d", d);
    let d = rt.load_name(ctx, "d")?;
    let (a, one) = (rt.intern_str("a")?, rt.intern_int(1)?);
    rt.setitem(d, a, one)?;
    let b = rt.intern_str("b")?;
    let v = rt.getitem(d, b)?;
    call_name(rt, ctx, "print", &[v])?;
    Ok(())
}

// print(1 + 'a')
pub(crate) fn arith_error(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let (one, a) = (rt.intern_int(1)?, rt.intern_str("a")?);
    let sum = rt.binary(BinOp::Add, one, a)?;
    call_name(rt, ctx, "print", &[sum])?;
    Ok(())
}
