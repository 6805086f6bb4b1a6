use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::core::Value;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    match kind {
        MethodKind::BytesDecode => {
            validate_arity(kind, args.len(), 0, 1)?;
            if let Some(&enc) = args.first() {
                let enc = expect_str_arg(rt, kind, enc)?.to_ascii_lowercase();
                if !matches!(enc.as_str(), "utf-8" | "utf8" | "ascii") {
                    return Err(Fatal::new(DiagnosticKind::InvalidValue(format!(
                        "unknown encoding: {enc}"
                    ))));
                }
            }
            let bytes = rt.as_bytes(recv).unwrap_or_default().to_vec();
            let text = String::from_utf8(bytes)
                .map_err(|_| Fatal::new(DiagnosticKind::InvalidValue("invalid utf-8 data".into())))?;
            rt.new_str(text)
        }
        _ => unreachable!("{kind:?} is not a bytes method"),
    }
}
