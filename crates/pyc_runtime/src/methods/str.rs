use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::core::Value;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

fn receiver(rt: &Runtime, recv: Value) -> String {
    rt.as_str(recv).unwrap_or_default().to_string()
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    match kind {
        MethodKind::StrJoin => {
            validate_arity(kind, args.len(), 1, 1)?;
            let sep = receiver(rt, recv);
            let mut out = String::new();
            for (i, item) in rt.collect_iter(args[0])?.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(&sep);
                }
                match rt.as_str(item) {
                    Some(s) => out.push_str(s),
                    None => return Err(bad_arg(rt, kind, "str", item)),
                }
            }
            rt.new_str(out)
        }
        MethodKind::StrSplit => {
            validate_arity(kind, args.len(), 0, 1)?;
            let s = receiver(rt, recv);
            let sep = match args.first() {
                Some(&v) if !rt.is_none(v) => Some(expect_str_arg(rt, kind, v)?),
                _ => None,
            };
            let parts: Vec<String> = match sep {
                None => s.split_whitespace().map(str::to_string).collect(),
                Some(sep) if sep.is_empty() => {
                    return Err(Fatal::new(DiagnosticKind::InvalidValue("empty separator".into())));
                }
                Some(sep) => s.split(sep.as_str()).map(str::to_string).collect(),
            };
            let mut items = Vec::with_capacity(parts.len());
            for part in parts {
                items.push(rt.new_str(part)?);
            }
            rt.new_list(items)
        }
        MethodKind::StrStartswith | MethodKind::StrEndswith => {
            validate_arity(kind, args.len(), 1, 1)?;
            let s = receiver(rt, recv);
            let candidates: Vec<Value> = if rt.is_tuple(args[0]) {
                seq_items(rt, args[0]).to_vec()
            } else {
                vec![args[0]]
            };
            let mut hit = false;
            for c in candidates {
                let affix = expect_str_arg(rt, kind, c)?;
                hit |= if kind == MethodKind::StrStartswith {
                    s.starts_with(affix.as_str())
                } else {
                    s.ends_with(affix.as_str())
                };
            }
            Ok(rt.create_bool_const(hit))
        }
        MethodKind::StrUpper => {
            validate_arity(kind, args.len(), 0, 0)?;
            let s = receiver(rt, recv).to_uppercase();
            rt.new_str(s)
        }
        MethodKind::StrLower => {
            validate_arity(kind, args.len(), 0, 0)?;
            let s = receiver(rt, recv).to_lowercase();
            rt.new_str(s)
        }
        MethodKind::StrStrip => {
            validate_arity(kind, args.len(), 0, 1)?;
            let s = receiver(rt, recv);
            let stripped = match args.first() {
                Some(&v) if !rt.is_none(v) => {
                    let chars = expect_str_arg(rt, kind, v)?;
                    s.trim_matches(|c: char| chars.contains(c)).to_string()
                }
                _ => s.trim().to_string(),
            };
            rt.new_str(stripped)
        }
        _ => unreachable!("{kind:?} is not a str method"),
    }
}
