use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::containers::normalize_index;
use crate::core::Value;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    match kind {
        MethodKind::ListAppend => {
            validate_arity(kind, args.len(), 1, 1)?;
            list_mut(rt, recv).push(args[0]);
            Ok(rt.none())
        }
        MethodKind::ListCount => {
            validate_arity(kind, args.len(), 1, 1)?;
            let n = count_of(rt, recv, args[0]);
            rt.new_int(n as i64)
        }
        MethodKind::ListExtend => {
            validate_arity(kind, args.len(), 1, 1)?;
            let items = rt.collect_iter(args[0])?;
            list_mut(rt, recv).extend(items);
            Ok(rt.none())
        }
        MethodKind::ListIndex => {
            validate_arity(kind, args.len(), 1, 1)?;
            let i = index_of(rt, recv, args[0], "list")?;
            rt.new_int(i as i64)
        }
        MethodKind::ListInsert => {
            validate_arity(kind, args.len(), 2, 2)?;
            let idx = expect_int_arg(rt, kind, args[0])?;
            let list = list_mut(rt, recv);
            let len = list.len() as i64;
            // out-of-range positions clamp to the ends
            let pos = if idx < 0 { (idx + len).max(0) } else { idx.min(len) };
            list.insert(pos as usize, args[1]);
            Ok(rt.none())
        }
        MethodKind::ListPop => {
            validate_arity(kind, args.len(), 0, 1)?;
            let idx = match args.first() {
                Some(&v) => expect_int_arg(rt, kind, v)?,
                None => -1,
            };
            let len = seq_items(rt, recv).len();
            if len == 0 {
                return Err(Fatal::new(DiagnosticKind::EmptyCollection("list".into())));
            }
            let i = normalize_index(idx, len, "pop")?;
            Ok(list_mut(rt, recv).remove(i))
        }
        MethodKind::ListRemove => {
            validate_arity(kind, args.len(), 1, 1)?;
            let i = index_of(rt, recv, args[0], "list")?;
            list_mut(rt, recv).remove(i);
            Ok(rt.none())
        }
        MethodKind::ListReverse => {
            validate_arity(kind, args.len(), 0, 0)?;
            list_mut(rt, recv).reverse();
            Ok(rt.none())
        }
        MethodKind::ListSort => {
            validate_arity(kind, args.len(), 0, 0)?;
            let sorted = rt.sorted_values(seq_items(rt, recv))?;
            *list_mut(rt, recv) = sorted;
            Ok(rt.none())
        }
        MethodKind::ListClear => {
            validate_arity(kind, args.len(), 0, 0)?;
            list_mut(rt, recv).clear();
            Ok(rt.none())
        }
        MethodKind::ListCopy => {
            validate_arity(kind, args.len(), 0, 0)?;
            let items = seq_items(rt, recv).to_vec();
            rt.new_list(items)
        }
        _ => unreachable!("{kind:?} is not a list method"),
    }
}
