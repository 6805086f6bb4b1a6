use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::core::{Object, Value, ViewKind};
use pyc_core::RunResult;

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    match kind {
        MethodKind::DictClear => {
            validate_arity(kind, args.len(), 0, 0)?;
            rt.dict_mut(recv).clear();
            Ok(rt.none())
        }
        MethodKind::DictCopy => {
            validate_arity(kind, args.len(), 0, 0)?;
            let table = rt.dict_ref(recv).clone();
            rt.alloc(Object::Dict(Box::new(table)))
        }
        MethodKind::DictGet => {
            validate_arity(kind, args.len(), 1, 2)?;
            match rt.dict_lookup(recv, args[0])? {
                Some(v) => Ok(v),
                None => Ok(args.get(1).copied().unwrap_or(rt.none())),
            }
        }
        MethodKind::DictKeys => view(rt, recv, kind, args, ViewKind::Keys),
        MethodKind::DictValues => view(rt, recv, kind, args, ViewKind::Values),
        MethodKind::DictItems => view(rt, recv, kind, args, ViewKind::Items),
        MethodKind::DictPop => {
            validate_arity(kind, args.len(), 1, 2)?;
            match rt.dict_remove(recv, args[0])? {
                Some(v) => Ok(v),
                None => match args.get(1) {
                    Some(&default) => Ok(default),
                    None => Err(rt.key_not_found(args[0])),
                },
            }
        }
        MethodKind::DictUpdate => {
            validate_arity(kind, args.len(), 1, 1)?;
            rt.dict_update(recv, args[0])?;
            Ok(rt.none())
        }
        _ => unreachable!("{kind:?} is not a dict method"),
    }
}

fn view(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
    view: ViewKind,
) -> RunResult<Value> {
    validate_arity(kind, args.len(), 0, 0)?;
    rt.alloc(Object::View {
        dict: recv,
        kind: view,
    })
}
