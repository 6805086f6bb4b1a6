use crate::Runtime;
use crate::core::{Iter, Object, TypeKind, Value};
use crate::ops::sized;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> RunResult<()> {
    if args.len() < min || args.len() > max {
        return Err(Fatal::new(DiagnosticKind::ArgumentCount {
            name: name.to_string(),
            min,
            max,
            actual: args.len(),
        }));
    }
    Ok(())
}

/// Call a builtin class: `int(x)`, `list(it)`, `range(a, b)` and so on.
pub fn construct(
    rt: &mut Runtime,
    kind: TypeKind,
    args: &[Value],
    kwargs: Option<Value>,
) -> RunResult<Value> {
    let name = kind.name();
    if kwargs.is_some() {
        return Err(Fatal::new(DiagnosticKind::NoKeywordArgs(name.to_string())));
    }
    match kind {
        TypeKind::Bool => {
            arity(name, args, 0, 1)?;
            let b = args.first().is_some_and(|&v| rt.truthy(v));
            Ok(rt.create_bool_const(b))
        }
        TypeKind::Int => construct_int(rt, args),
        TypeKind::Str => {
            arity(name, args, 0, 1)?;
            let text = args.first().map_or_else(String::new, |&v| rt.str_of(v));
            rt.new_str(text)
        }
        TypeKind::Bytes => construct_bytes(rt, args),
        TypeKind::List => {
            arity(name, args, 0, 1)?;
            let items = match args.first() {
                Some(&v) => rt.collect_iter(v)?,
                None => Vec::new(),
            };
            rt.new_list(items)
        }
        TypeKind::Tuple => {
            arity(name, args, 0, 1)?;
            let items = match args.first() {
                Some(&v) => rt.collect_iter(v)?,
                None => Vec::new(),
            };
            rt.new_tuple(items)
        }
        TypeKind::Set => {
            arity(name, args, 0, 1)?;
            let items = match args.first() {
                Some(&v) => rt.collect_iter(v)?,
                None => Vec::new(),
            };
            rt.new_set_from(&items)
        }
        TypeKind::Dict => {
            arity(name, args, 0, 1)?;
            let dict = rt.new_dict()?;
            if let Some(&source) = args.first() {
                rt.dict_update(dict, source)?;
            }
            Ok(dict)
        }
        TypeKind::Range => {
            arity(name, args, 1, 3)?;
            let mut bounds = [0i64; 3];
            for (slot, &v) in bounds.iter_mut().zip(args) {
                *slot = rt.expect_int(v, name)?;
            }
            match args.len() {
                1 => rt.new_range(0, bounds[0], 1),
                2 => rt.new_range(bounds[0], bounds[1], 1),
                _ => rt.new_range(bounds[0], bounds[1], bounds[2]),
            }
        }
        TypeKind::Enumerate => {
            arity(name, args, 1, 2)?;
            let count = match args.get(1) {
                Some(&v) => rt.expect_int(v, name)?,
                None => 0,
            };
            let inner = rt.iter(args[0])?;
            rt.new_iter(Iter::Enumerate { inner, count })
        }
        TypeKind::Reversed => {
            let [seq] = rt.exact_args(name, args)?;
            rt.reversed(seq)
        }
        TypeKind::Zip => {
            let [a, b] = rt.exact_args(name, args)?;
            let left = rt.iter(a)?;
            let right = rt.iter(b)?;
            rt.new_iter(Iter::Zip { left, right })
        }
        TypeKind::Type => {
            let [v] = rt.exact_args(name, args)?;
            Ok(rt.type_of(v))
        }
        _ => Err(Fatal::new(DiagnosticKind::InvalidValue(format!(
            "cannot create '{name}' instances"
        )))),
    }
}

fn parse_int(text: &str, base: u32) -> RunResult<i64> {
    let invalid = || {
        Fatal::new(DiagnosticKind::InvalidLiteral {
            base,
            text: text.to_string(),
        })
    };
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = match base {
        16 => digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")).unwrap_or(digits),
        8 => digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")).unwrap_or(digits),
        2 => digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")).unwrap_or(digits),
        _ => digits,
    };
    // single underscores may separate digits
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || digits.starts_with(['+', '-'])
    {
        return Err(invalid());
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    let magnitude = u64::from_str_radix(&cleaned, base).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => Fatal::new(DiagnosticKind::IntegerOverflow("int")),
        _ => invalid(),
    })?;
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    value.ok_or(Fatal::new(DiagnosticKind::IntegerOverflow("int")))
}

fn construct_int(rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
    arity("int", args, 0, 2)?;
    match *args {
        [] => rt.new_int(0),
        [v] => {
            if let Some(n) = rt.as_int(v) {
                return rt.new_int(n);
            }
            let n = match rt.object(v) {
                Object::Str(s) => parse_int(s.as_str(), 10)?,
                _ => return Err(rt.bad_argument("int", "int or str", v)),
            };
            rt.new_int(n)
        }
        [v, base] => {
            let base = rt.expect_int(base, "int")?;
            if !(2..=36).contains(&base) {
                return Err(Fatal::new(DiagnosticKind::InvalidValue(
                    "int() base must be >= 2 and <= 36".into(),
                )));
            }
            let text = rt.expect_str(v, "int")?;
            let n = parse_int(text, base as u32)?;
            rt.new_int(n)
        }
        _ => unreachable!("arity checked"),
    }
}

fn construct_bytes(rt: &mut Runtime, args: &[Value]) -> RunResult<Value> {
    arity("bytes", args, 0, 2)?;
    let data = match *args {
        [] => Vec::new(),
        [v] => match rt.object(v) {
            Object::Bytes(b) => b.clone(),
            Object::Int(n) => {
                if *n < 0 {
                    return Err(Fatal::new(DiagnosticKind::InvalidValue("negative count".into())));
                }
                vec![0; sized::<u8>(*n as usize, "bytes count")?]
            }
            Object::Str(_) => {
                return Err(Fatal::new(DiagnosticKind::InvalidValue(
                    "string argument without an encoding".into(),
                )));
            }
            _ => {
                let items = rt.collect_iter(v)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match rt.as_int(item) {
                        Some(b @ 0..=255) => out.push(b as u8),
                        Some(_) => {
                            return Err(Fatal::new(DiagnosticKind::InvalidValue(
                                "bytes must be in range(0, 256)".into(),
                            )));
                        }
                        None => return Err(rt.bad_argument("bytes", "int", item)),
                    }
                }
                out
            }
        },
        [v, encoding] => {
            let encoding = rt.expect_str(encoding, "bytes")?.to_ascii_lowercase();
            if !matches!(encoding.as_str(), "utf-8" | "utf8" | "ascii") {
                return Err(Fatal::new(DiagnosticKind::InvalidValue(format!(
                    "unknown encoding: {encoding}"
                ))));
            }
            let text = rt.expect_str(v, "bytes")?;
            if encoding == "ascii" && !text.is_ascii() {
                return Err(Fatal::new(DiagnosticKind::InvalidValue(
                    "'ascii' codec can't encode non-ASCII text".into(),
                )));
            }
            text.as_bytes().to_vec()
        }
        _ => unreachable!("arity checked"),
    };
    rt.new_bytes(data)
}

pub fn builtin_ord(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("ord", args)?;
    let code = match rt.object(v) {
        Object::Str(s) => {
            let mut chars = s.value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c as i64),
                _ => None,
            }
        }
        Object::Bytes(b) if b.len() == 1 => Some(b[0] as i64),
        Object::Bytes(_) => None,
        _ => return Err(rt.bad_argument("ord", "str", v)),
    };
    match code {
        Some(n) => rt.new_int(n),
        None => Err(Fatal::new(DiagnosticKind::InvalidValue(
            "ord() expected a character".into(),
        ))),
    }
}

pub fn builtin_chr(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let [v] = rt.exact_args("chr", args)?;
    let n = rt.expect_int(v, "chr")?;
    let c = u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .ok_or(Fatal::new(DiagnosticKind::InvalidValue(
            "chr() arg not in range(0x110000)".into(),
        )))?;
    rt.new_str(c.to_string())
}
