use super::MethodKind;
use super::common::*;
use crate::Runtime;
use crate::core::{FileHandle, Object, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};
use std::io::{Read, Write};

fn io_error(e: std::io::Error) -> Fatal {
    Fatal::new(DiagnosticKind::Io(e.to_string()))
}

/// Pull up to three more bytes so a bounded text read never ends inside
/// a multibyte character.
fn finish_char(reader: &mut impl Read, buf: &mut Vec<u8>) -> RunResult<()> {
    for _ in 0..3 {
        let truncated = matches!(std::str::from_utf8(buf), Err(e) if e.error_len().is_none());
        if !truncated {
            break;
        }
        let mut byte = [0u8; 1];
        if reader.read(&mut byte).map_err(io_error)? == 0 {
            break;
        }
        buf.push(byte[0]);
    }
    Ok(())
}

fn file_mut(rt: &mut Runtime, recv: Value) -> &mut crate::core::File {
    match rt.object_mut(recv) {
        Object::File(f) => f,
        _ => panic!("not a file: {recv:?}"),
    }
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    match kind {
        MethodKind::FileRead => {
            validate_arity(kind, args.len(), 0, 1)?;
            let limit = match args.first() {
                Some(&v) if !rt.is_none(v) => Some(expect_int_arg(rt, kind, v)?),
                _ => None,
            };
            let file = file_mut(rt, recv);
            let binary = file.binary;
            let mut buf = Vec::new();
            match &mut file.handle {
                FileHandle::Reader(reader) => match limit {
                    Some(n) if n >= 0 => {
                        reader.by_ref().take(n as u64).read_to_end(&mut buf).map_err(io_error)?;
                        if !binary {
                            finish_char(reader, &mut buf)?;
                        }
                    }
                    _ => {
                        reader.read_to_end(&mut buf).map_err(io_error)?;
                    }
                },
                FileHandle::Writer(_) => {
                    return Err(Fatal::new(DiagnosticKind::Io("file not open for reading".into())));
                }
                FileHandle::Closed => return Err(Fatal::new(DiagnosticKind::FileClosed)),
            }
            if binary {
                rt.new_bytes(buf)
            } else {
                let text = String::from_utf8(buf).map_err(|e| {
                    Fatal::new(DiagnosticKind::Io(format!(
                        "invalid utf-8 at byte {}",
                        e.utf8_error().valid_up_to()
                    )))
                })?;
                rt.new_str(text)
            }
        }
        MethodKind::FileWrite => {
            validate_arity(kind, args.len(), 1, 1)?;
            let data = match rt.object(args[0]) {
                Object::Str(s) => s.value.as_bytes().to_vec(),
                Object::Bytes(b) => b.clone(),
                _ => return Err(bad_arg(rt, kind, "str", args[0])),
            };
            match &mut file_mut(rt, recv).handle {
                FileHandle::Writer(writer) => writer.write_all(&data).map_err(io_error)?,
                FileHandle::Reader(_) => {
                    return Err(Fatal::new(DiagnosticKind::Io("file not open for writing".into())));
                }
                FileHandle::Closed => return Err(Fatal::new(DiagnosticKind::FileClosed)),
            }
            Ok(rt.none())
        }
        MethodKind::FileClose => {
            validate_arity(kind, args.len(), 0, 0)?;
            let file = file_mut(rt, recv);
            if let FileHandle::Writer(writer) = &mut file.handle {
                writer.flush().map_err(io_error)?;
            }
            file.handle = FileHandle::Closed;
            Ok(rt.none())
        }
        _ => unreachable!("{kind:?} is not a file method"),
    }
}
