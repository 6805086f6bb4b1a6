use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::core::{Object, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    match kind {
        MethodKind::SetAdd => {
            validate_arity(kind, args.len(), 1, 1)?;
            rt.set_insert(recv, args[0])?;
        }
        MethodKind::SetClear => {
            validate_arity(kind, args.len(), 0, 0)?;
            rt.set_mut(recv).clear();
        }
        MethodKind::SetCopy => {
            validate_arity(kind, args.len(), 0, 0)?;
            let table = rt.set_ref(recv).clone();
            return rt.alloc(Object::Set(Box::new(table)));
        }
        MethodKind::SetDifferenceUpdate => {
            for &other in args {
                for item in rt.collect_iter(other)? {
                    rt.set_remove(recv, item)?;
                }
            }
        }
        MethodKind::SetDiscard => {
            validate_arity(kind, args.len(), 1, 1)?;
            rt.set_remove(recv, args[0])?;
        }
        MethodKind::SetRemove => {
            validate_arity(kind, args.len(), 1, 1)?;
            if !rt.set_remove(recv, args[0])? {
                return Err(Fatal::new(DiagnosticKind::NotInContainer {
                    container: "set",
                    item: rt.repr(args[0]),
                }));
            }
        }
        MethodKind::SetUpdate => {
            for &other in args {
                for item in rt.collect_iter(other)? {
                    rt.set_insert(recv, item)?;
                }
            }
        }
        _ => unreachable!("{kind:?} is not a set method"),
    }
    Ok(rt.none())
}
