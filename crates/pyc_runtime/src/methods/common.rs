use super::MethodKind;
use crate::Runtime;
use crate::core::{Object, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

/// Check the argument count of a method call.
pub fn validate_arity(kind: MethodKind, args_len: usize, min: usize, max: usize) -> RunResult<()> {
    if args_len < min || args_len > max {
        return Err(Fatal::new(DiagnosticKind::ArgumentCount {
            name: kind.qualified_name(),
            min,
            max,
            actual: args_len,
        }));
    }
    Ok(())
}

/// `bad argument to owner.method()`.
pub fn bad_arg(rt: &Runtime, kind: MethodKind, expected: &'static str, actual: Value) -> Fatal {
    rt.bad_argument(&kind.qualified_name(), expected, actual)
}

pub fn expect_receiver(rt: &Runtime, recv: Value, kind: MethodKind) -> RunResult<()> {
    if rt.object(recv).kind() == Some(kind.owner()) {
        Ok(())
    } else {
        Err(bad_arg(rt, kind, kind.owner().name(), recv))
    }
}

pub fn expect_int_arg(rt: &Runtime, kind: MethodKind, v: Value) -> RunResult<i64> {
    rt.as_int(v).ok_or_else(|| bad_arg(rt, kind, "int", v))
}

pub fn expect_str_arg(rt: &Runtime, kind: MethodKind, v: Value) -> RunResult<String> {
    match rt.object(v) {
        Object::Str(s) => Ok(s.value.to_string()),
        _ => Err(bad_arg(rt, kind, "str", v)),
    }
}

pub fn list_mut(rt: &mut Runtime, recv: Value) -> &mut Vec<Value> {
    match rt.object_mut(recv) {
        Object::List(items) => items,
        _ => panic!("not a list: {recv:?}"),
    }
}

pub fn seq_items(rt: &Runtime, recv: Value) -> &[Value] {
    rt.as_seq(recv)
        .unwrap_or_else(|| panic!("not a sequence: {recv:?}"))
}

/// Position of the first element equal to `needle`, or a fatal
/// `x is not in <container>`.
pub fn index_of(rt: &Runtime, recv: Value, needle: Value, container: &'static str) -> RunResult<usize> {
    seq_items(rt, recv)
        .iter()
        .position(|x| rt.values_equal(*x, needle))
        .ok_or_else(|| {
            Fatal::new(DiagnosticKind::NotInContainer {
                container,
                item: rt.repr(needle),
            })
        })
}

pub fn count_of(rt: &Runtime, recv: Value, needle: Value) -> usize {
    seq_items(rt, recv)
        .iter()
        .filter(|x| rt.values_equal(**x, needle))
        .count()
}
