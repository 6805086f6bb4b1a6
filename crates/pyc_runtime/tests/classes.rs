mod common;

use common::{call_builtin, message, runtime};
use pyc_runtime::{ContextId, RunResult, Runtime, Value};

// def __init__(self, x): self.x = x
fn point_init(
    rt: &mut Runtime,
    _globals: ContextId,
    _caller: ContextId,
    args: Value,
    _kwargs: Option<Value>,
) -> RunResult<Value> {
    let args = rt.args_of(args);
    rt.setattr(args[0], "x", args[1])?;
    Ok(rt.none())
}

// def get_x(self): return self.x
fn point_get_x(
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
    rt.getattr(this, "x")
}

fn point_class(rt: &mut Runtime) -> Value {
    let init = rt.function_def("__init__", point_init).unwrap();
    let get_x = rt.function_def("get_x", point_get_x).unwrap();
    let origin = rt.new_int(0).unwrap();
    rt.new_class("Point", &[("__init__", init), ("get_x", get_x), ("origin", origin)])
        .unwrap()
}

#[test]
fn construction_runs_init_and_binds_methods() {
    let (mut rt, ctx) = runtime();
    let point = point_class(&mut rt);
    let seven = rt.new_int(7).unwrap();
    let p = rt.call_values(ctx, point, &[seven]).unwrap();

    let x = rt.getattr(p, "x").unwrap();
    assert!(x.is(seven));
    let get_x = rt.getattr(p, "get_x").unwrap();
    assert_eq!(rt.type_name(get_x), "method");
    assert_eq!(rt.repr(get_x), "<bound method Point.get_x>");
    let result = rt.call_values(ctx, get_x, &[]).unwrap();
    assert!(result.is(seven));

    let origin = rt.getattr(p, "origin").unwrap();
    assert_eq!(rt.as_int(origin), Some(0));
    let class = rt.getattr(p, "__class__").unwrap();
    assert!(class.is(point));
    assert_eq!(rt.repr(p), "<Point object>");
}

#[test]
fn bound_methods_are_eager_per_instance() {
    let (mut rt, ctx) = runtime();
    let point = point_class(&mut rt);
    let one = rt.new_int(1).unwrap();
    let two = rt.new_int(2).unwrap();
    let a = rt.call_values(ctx, point, &[one]).unwrap();
    let b = rt.call_values(ctx, point, &[two]).unwrap();
    let ma = rt.getattr(a, "get_x").unwrap();
    let ma_again = rt.getattr(a, "get_x").unwrap();
    let mb = rt.getattr(b, "get_x").unwrap();
    assert!(ma.is(ma_again));
    assert!(!ma.is(mb));
    let from_b = rt.call_values(ctx, mb, &[]).unwrap();
    assert!(from_b.is(two));
}

#[test]
fn class_without_init_rejects_arguments() {
    let (mut rt, ctx) = runtime();
    let empty = rt.new_class("Empty", &[]).unwrap();
    let one = rt.new_int(1).unwrap();
    let err = rt.call_values(ctx, empty, &[one]).unwrap_err();
    assert_eq!(
        message(err),
        "wrong number of arguments to Empty(): expected 0, got 1"
    );
}

#[test]
fn attributes_are_set_and_missing_ones_are_fatal() {
    let (mut rt, ctx) = runtime();
    let empty = rt.new_class("Empty", &[]).unwrap();
    let e = rt.call_values(ctx, empty, &[]).unwrap();
    let err = rt.getattr(e, "nope").unwrap_err();
    assert_eq!(message(err), "'Empty' object has no attribute 'nope'");

    let n = rt.new_int(3).unwrap();
    let err = rt.setattr(n, "x", n).unwrap_err();
    assert_eq!(message(err), "setattr unimplemented for 'int'");

    let name = rt.getattr(empty, "__name__").unwrap();
    assert_eq!(rt.as_str(name), Some("Empty"));
}

#[test]
fn isinstance_and_type() {
    let (mut rt, ctx) = runtime();
    let point = point_class(&mut rt);
    let one = rt.new_int(1).unwrap();
    let p = rt.call_values(ctx, point, &[one]).unwrap();
    let yes = call_builtin(&mut rt, ctx, "isinstance", &[p, point]).unwrap();
    assert!(rt.truthy(yes));

    let int_type = rt.load_name(ctx, "int").unwrap();
    let t = rt.create_bool_const(true);
    let bool_is_int = call_builtin(&mut rt, ctx, "isinstance", &[t, int_type]).unwrap();
    assert!(rt.truthy(bool_is_int));
    let no = call_builtin(&mut rt, ctx, "isinstance", &[p, int_type]).unwrap();
    assert!(!rt.truthy(no));

    let ty = call_builtin(&mut rt, ctx, "type", &[one]).unwrap();
    assert!(ty.is(int_type));
    assert_eq!(rt.repr(ty), "<class 'int'>");
}

#[test]
fn calling_a_non_callable_is_fatal() {
    let (mut rt, ctx) = runtime();
    let n = rt.new_int(1).unwrap();
    let err = rt.call_values(ctx, n, &[]).unwrap_err();
    assert_eq!(message(err), "'int' object is not callable");
}
