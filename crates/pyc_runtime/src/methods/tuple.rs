use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::core::Value;
use pyc_core::RunResult;

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    validate_arity(kind, args.len(), 1, 1)?;
    match kind {
        MethodKind::TupleCount => {
            let n = count_of(rt, recv, args[0]);
            rt.new_int(n as i64)
        }
        MethodKind::TupleIndex => {
            let i = index_of(rt, recv, args[0], "tuple")?;
            rt.new_int(i as i64)
        }
        _ => unreachable!("{kind:?} is not a tuple method"),
    }
}
