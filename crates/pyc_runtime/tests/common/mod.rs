#![allow(dead_code)]

use pyc_runtime::{ContextId, Fatal, RunResult, Runtime, RuntimeConfig, Value};

/// A capturing runtime with an initialized module context.
pub fn runtime() -> (Runtime, ContextId) {
    runtime_with(RuntimeConfig::captured())
}

pub fn runtime_with(config: RuntimeConfig) -> (Runtime, ContextId) {
    let mut rt = Runtime::with_config(config).unwrap();
    let ctx = rt.new_context(None, 8).unwrap();
    rt.init_context(ctx, &["prog".to_string(), "input.txt".to_string()])
        .unwrap();
    (rt, ctx)
}

/// Call the builtin bound to `name` in the module context.
pub fn call_builtin(rt: &mut Runtime, ctx: ContextId, name: &str, args: &[Value]) -> RunResult<Value> {
    let f = rt.load_name(ctx, name)?;
    rt.call_values(ctx, f, args)
}

/// Call method `name` on `recv`.
pub fn call_method(rt: &mut Runtime, ctx: ContextId, recv: Value, name: &str, args: &[Value]) -> RunResult<Value> {
    let m = rt.getattr(recv, name)?;
    rt.call_values(ctx, m, args)
}

pub fn ints(rt: &mut Runtime, values: &[i64]) -> Vec<Value> {
    values.iter().map(|&n| rt.new_int(n).unwrap()).collect()
}

pub fn int_list(rt: &mut Runtime, values: &[i64]) -> Value {
    let items = ints(rt, values);
    rt.new_list(items).unwrap()
}

pub fn message(err: Fatal) -> String {
    err.message()
}
