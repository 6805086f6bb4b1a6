use super::{call_method, call_name};
use pyc_runtime::{BinOp, ContextId, RunResult, Runtime};

const ROUNDS: i64 = 10_000;

// keep = []
// for i in range(10000):
//     s = str(i)
//     if i % 100 == 0:
//         keep.append(s)
// print(len(keep), keep[-1])
pub(crate) fn gc_stress(rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
    let keep = rt.new_list(Vec::new())?;
    rt.store_name(ctx, "keep", keep);

    let bound = rt.intern_int(ROUNDS)?;
    let range = call_name(rt, ctx, "range", &[bound])?;
    let it = rt.iter(range)?;
    rt.store(ctx, 0, it);
    let (hundred, zero) = (rt.intern_int(100)?, rt.intern_int(0)?);
    loop {
        let it = rt.load(ctx, 0)?;
        let Some(i) = rt.next(it)? else { break };
        rt.store_name(ctx, "i", i);
        let s = call_name(rt, ctx, "str", &[i])?;
        rt.store_name(ctx, "s", s);
        let rem = rt.binary(BinOp::Mod, i, hundred)?;
        if rt.values_equal(rem, zero) {
            let keep = rt.load_name(ctx, "keep")?;
            call_method(rt, ctx, keep, "append", &[s])?;
        }
        rt.collect_garbage(ctx, None);
    }

    let keep = rt.load_name(ctx, "keep")?;
    let n = call_name(rt, ctx, "len", &[keep])?;
    let last = rt.intern_int(-1)?;
    let tail = rt.getitem(keep, last)?;
    call_name(rt, ctx, "print", &[n, tail])?;
    Ok(())
}
