use crate::Runtime;
use crate::core::{Object, TypeKind, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};

pub fn builtin_print(rt: &mut Runtime, args: &[Value], kwargs: Option<Value>) -> RunResult<Value> {
    let sep = match rt.keyword(kwargs, "sep") {
        Some(v) if !rt.is_none(v) => rt.expect_str(v, "print")?.to_string(),
        _ => " ".to_string(),
    };
    let end = match rt.keyword(kwargs, "end") {
        Some(v) if !rt.is_none(v) => rt.expect_str(v, "print")?.to_string(),
        _ => "\n".to_string(),
    };
    let mut line = String::new();
    for (i, &arg) in args.iter().enumerate() {
        if i > 0 {
            line.push_str(&sep);
        }
        line.push_str(&rt.str_of(arg));
    }
    line.push_str(&end);
    rt.write_output(&line);
    Ok(rt.none())
}

pub fn builtin_repr(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("repr", args)?;
    let text = rt.repr(v);
    rt.new_str(text)
}

pub fn builtin_len(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("len", args)?;
    let n = match rt.object(v) {
        Object::Str(s) => s.value.chars().count(),
        Object::Bytes(b) => b.len(),
        Object::List(items) => items.len(),
        Object::Tuple(items) => items.len(),
        Object::Dict(d) => d.len(),
        Object::Set(s) => s.len(),
        Object::Range(r) => r.len(),
        Object::View { dict, .. } => rt.dict_ref(*dict).len(),
        _ => return Err(rt.unimplemented("len", v)),
    };
    let n = i64::try_from(n).map_err(|_| Fatal::new(DiagnosticKind::IntegerOverflow("len")))?;
    rt.new_int(n)
}

pub fn builtin_hash(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("hash", args)?;
    let h = rt.hash_of(v)?;
    rt.new_int(h as i64)
}

fn instance_of(rt: &Runtime, obj: Value, class: Value) -> RunResult<bool> {
    match rt.object(class) {
        Object::Type(TypeKind::Int) => Ok(rt.as_int(obj).is_some()),
        Object::Type(_) | Object::Class(_) => Ok(rt.type_of(obj).is(class)),
        Object::Tuple(classes) => {
            for &c in classes.iter() {
                if instance_of(rt, obj, c)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => Err(rt.bad_argument("isinstance", "type", class)),
    }
}

/// `isinstance(obj, cls)`; `cls` may be a tuple of classes. Booleans are
/// integers.
pub fn builtin_isinstance(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [obj, class] = rt.exact_args("isinstance", args)?;
    Ok(rt.create_bool_const(instance_of(rt, obj, class)?))
}

pub fn builtin_iter(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("iter", args)?;
    rt.iter(v)
}

/// `next(it[, default])`.
pub fn builtin_next(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let (it, default) = match *args {
        [it] => (it, None),
        [it, default] => (it, Some(default)),
        _ => {
            return Err(Fatal::new(DiagnosticKind::ArgumentCount {
                name: "next".into(),
                min: 1,
                max: 2,
                actual: args.len(),
            }));
        }
    };
    match rt.next(it)? {
        Some(v) => Ok(v),
        None => default.ok_or(Fatal::new(DiagnosticKind::IteratorExhausted)),
    }
}

pub fn builtin_abs(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("abs", args)?;
    let Some(n) = rt.as_int(v) else {
        return Err(rt.unimplemented("abs", v));
    };
    let n = n
        .checked_abs()
        .ok_or(Fatal::new(DiagnosticKind::IntegerOverflow("abs")))?;
    rt.new_int(n)
}
