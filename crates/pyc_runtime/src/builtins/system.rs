use crate::Runtime;
use crate::core::{File, FileHandle, Object, Value};
use pyc_core::{DiagnosticKind, Fatal, RunResult};
use std::fs::OpenOptions;
use std::io::{self, BufReader, BufWriter};

const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// `open(path[, mode])` with mode one of `r`, `w`, `a`, each optionally
/// suffixed by `b`.
pub fn builtin_open(rt: &mut Runtime, args: &[Value], _kwargs: Option<Value>) -> RunResult<Value> {
    let (path, mode) = match *args {
        [path] => (rt.expect_str(path, "open")?.to_string(), "r".to_string()),
        [path, mode] => (
            rt.expect_str(path, "open")?.to_string(),
            rt.expect_str(mode, "open")?.to_string(),
        ),
        _ => {
            return Err(Fatal::new(DiagnosticKind::ArgumentCount {
                name: "open".into(),
                min: 1,
                max: 2,
                actual: args.len(),
            }));
        }
    };
    let (access, binary) = match mode.as_str() {
        "r" | "rt" => ('r', false),
        "rb" => ('r', true),
        "w" | "wt" => ('w', false),
        "wb" => ('w', true),
        "a" | "at" => ('a', false),
        "ab" => ('a', true),
        other => {
            return Err(Fatal::new(DiagnosticKind::InvalidValue(format!(
                "invalid mode: '{other}'"
            ))));
        }
    };
    let mut options = OpenOptions::new();
    match access {
        'r' => options.read(true),
        'w' => options.write(true).create(true).truncate(true),
        _ => options.append(true).create(true),
    };
    let file = options.open(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Fatal::new(DiagnosticKind::FileNotFound(path.clone())),
        _ => Fatal::new(DiagnosticKind::Io(format!("{path}: {e}"))),
    })?;
    let handle = if access == 'r' {
        FileHandle::Reader(BufReader::with_capacity(FILE_BUFFER_SIZE, file))
    } else {
        FileHandle::Writer(BufWriter::with_capacity(FILE_BUFFER_SIZE, file))
    };
    tracing::debug!(%path, %mode, "opened file");
    rt.alloc(Object::File(Box::new(File {
        path: path.into(),
        binary,
        handle,
    })))
}
