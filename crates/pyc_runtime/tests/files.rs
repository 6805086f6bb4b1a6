mod common;

use common::{call_builtin, call_method, message, runtime};

#[test]
fn write_then_read_back() {
    let (mut rt, ctx) = runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let path_value = rt.new_str(path.to_string_lossy().into_owned()).unwrap();

    let w = rt.new_str("w").unwrap();
    let file = call_builtin(&mut rt, ctx, "open", &[path_value, w]).unwrap();
    assert_eq!(rt.type_name(file), "file");
    let text = rt.new_str("héllo\n").unwrap();
    call_method(&mut rt, ctx, file, "write", &[text]).unwrap();
    call_method(&mut rt, ctx, file, "close", &[]).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "héllo\n");

    let reader = call_builtin(&mut rt, ctx, "open", &[path_value]).unwrap();
    let content = call_method(&mut rt, ctx, reader, "read", &[]).unwrap();
    assert_eq!(rt.as_str(content), Some("héllo\n"));

    let rb = rt.new_str("rb").unwrap();
    let binary = call_builtin(&mut rt, ctx, "open", &[path_value, rb]).unwrap();
    let two = rt.new_int(2).unwrap();
    let head = call_method(&mut rt, ctx, binary, "read", &[two]).unwrap();
    assert_eq!(rt.repr(head), "b'h\\xc3'");
}

#[test]
fn append_mode_extends() {
    let (mut rt, ctx) = runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.txt");
    std::fs::write(&path, "one\n").unwrap();
    let path_value = rt.new_str(path.to_string_lossy().into_owned()).unwrap();

    let a = rt.new_str("a").unwrap();
    let file = call_builtin(&mut rt, ctx, "open", &[path_value, a]).unwrap();
    let line = rt.new_str("two\n").unwrap();
    call_method(&mut rt, ctx, file, "write", &[line]).unwrap();
    call_method(&mut rt, ctx, file, "close", &[]).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
}

#[test]
fn missing_file_is_fatal() {
    let (mut rt, ctx) = runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let shown = path.to_string_lossy().into_owned();
    let path_value = rt.new_str(shown.as_str()).unwrap();
    let err = call_builtin(&mut rt, ctx, "open", &[path_value]).unwrap_err();
    assert_eq!(message(err), format!("cannot open file '{shown}'"));
}

#[test]
fn closed_files_reject_io() {
    let (mut rt, ctx) = runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closed.txt");
    let path_value = rt.new_str(path.to_string_lossy().into_owned()).unwrap();
    let w = rt.new_str("w").unwrap();
    let file = call_builtin(&mut rt, ctx, "open", &[path_value, w]).unwrap();
    call_method(&mut rt, ctx, file, "close", &[]).unwrap();
    let text = rt.new_str("late").unwrap();
    let err = call_method(&mut rt, ctx, file, "write", &[text]).unwrap_err();
    assert_eq!(message(err), "I/O operation on closed file");

    let bad_mode = rt.new_str("x").unwrap();
    let err = call_builtin(&mut rt, ctx, "open", &[path_value, bad_mode]).unwrap_err();
    assert_eq!(message(err), "invalid mode: 'x'");
}

#[test]
fn text_reads_keep_characters_whole() {
    let (mut rt, ctx) = runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text.txt");
    std::fs::write(&path, "héllo").unwrap();
    let path_value = rt.new_str(path.to_string_lossy().into_owned()).unwrap();

    let reader = call_builtin(&mut rt, ctx, "open", &[path_value]).unwrap();
    let two = rt.new_int(2).unwrap();
    let head = call_method(&mut rt, ctx, reader, "read", &[two]).unwrap();
    assert_eq!(rt.as_str(head), Some("hé"));
    let rest = call_method(&mut rt, ctx, reader, "read", &[]).unwrap();
    assert_eq!(rt.as_str(rest), Some("llo"));
}

#[test]
fn invalid_utf8_in_text_mode_is_fatal() {
    let (mut rt, ctx) = runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.bin");
    std::fs::write(&path, [0xff, b'a']).unwrap();
    let path_value = rt.new_str(path.to_string_lossy().into_owned()).unwrap();

    let reader = call_builtin(&mut rt, ctx, "open", &[path_value]).unwrap();
    let err = call_method(&mut rt, ctx, reader, "read", &[]).unwrap_err();
    assert_eq!(message(err), "i/o error: invalid utf-8 at byte 0");

    let rb = rt.new_str("rb").unwrap();
    let binary = call_builtin(&mut rt, ctx, "open", &[path_value, rb]).unwrap();
    let raw = call_method(&mut rt, ctx, binary, "read", &[]).unwrap();
    assert_eq!(rt.repr(raw), "b'\\xffa'");
}
