use crate::Runtime;
use crate::core::Value;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

pub fn builtin_all(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("all", args)?;
    let items = rt.collect_iter(v)?;
    let all = items.iter().all(|&x| rt.truthy(x));
    Ok(rt.create_bool_const(all))
}

pub fn builtin_any(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("any", args)?;
    let items = rt.collect_iter(v)?;
    let any = items.iter().any(|&x| rt.truthy(x));
    Ok(rt.create_bool_const(any))
}

/// Candidates for `max`/`min`: the elements of a single iterable argument,
/// or the arguments themselves.
fn extremum_candidates(rt: &mut Runtime, name: &str, args: &[Value]) -> RunResult<Vec<Value>> {
    let items = match args {
        [] => {
            return Err(Fatal::new(DiagnosticKind::ArgumentCount {
                name: name.to_string(),
                min: 1,
                max: usize::MAX,
                actual: 0,
            }));
        }
        [single] => rt.collect_iter(*single)?,
        many => many.to_vec(),
    };
    if items.is_empty() {
        return Err(Fatal::new(DiagnosticKind::EmptyCollection(format!("{name}() argument"))));
    }
    Ok(items)
}

/// First largest element.
pub fn builtin_max(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let items = extremum_candidates(rt, "max", args)?;
    let mut best = items[0];
    for &item in &items[1..] {
        if rt.less_than(best, item)? {
            best = item;
        }
    }
    Ok(best)
}

/// First smallest element.
pub fn builtin_min(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let items = extremum_candidates(rt, "min", args)?;
    let mut best = items[0];
    for &item in &items[1..] {
        if rt.less_than(item, best)? {
            best = item;
        }
    }
    Ok(best)
}

pub fn builtin_sorted(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("sorted", args)?;
    let items = rt.collect_iter(v)?;
    let sorted = rt.sorted_values(&items)?;
    rt.new_list(sorted)
}
