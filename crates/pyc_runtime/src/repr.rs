//! Canonical text forms of values (`repr` and `str`) and `%` formatting.

use crate::Runtime;
use crate::core::{Entry, Object, Value, ViewKind};
use pyc_core::{DiagnosticKind, Fatal, ObjectId, RunResult};
use std::fmt::Write;

fn push_str_literal(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn push_bytes_literal(out: &mut String, bytes: &[u8]) {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') { b'"' } else { b'\'' };
    out.push('b');
    out.push(quote as char);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b == quote => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push(quote as char);
}

fn push_int(out: &mut String, n: i64) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(n));
}

impl Runtime {
    /// `repr(v)`.
    pub fn repr(&self, v: Value) -> String {
        let mut out = String::new();
        let mut active = Vec::new();
        self.write_repr(&mut out, v, &mut active);
        out
    }

    /// `str(v)`: strings render raw, everything else as `repr`.
    pub fn str_of(&self, v: Value) -> String {
        match self.object(v) {
            Object::Str(s) => s.value.to_string(),
            _ => self.repr(v),
        }
    }

    fn write_items(&self, out: &mut String, items: &[Value], active: &mut Vec<ObjectId>) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_repr(out, *item, active);
        }
    }

    fn write_repr(&self, out: &mut String, v: Value, active: &mut Vec<ObjectId>) {
        let obj = self.object(v);
        let container = matches!(
            obj,
            Object::List(_) | Object::Tuple(_) | Object::Dict(_) | Object::Set(_) | Object::View { .. }
        );
        if container {
            if active.contains(&v.id()) {
                out.push_str(match obj {
                    Object::List(_) => "[...]",
                    Object::Tuple(_) => "(...)",
                    _ => "{...}",
                });
                return;
            }
            active.push(v.id());
        }
        match obj {
            Object::None => out.push_str("None"),
            Object::Bool(b) => out.push_str(if *b { "True" } else { "False" }),
            Object::Int(n) => push_int(out, *n),
            Object::Str(s) => push_str_literal(out, &s.value),
            Object::Bytes(b) => push_bytes_literal(out, b),
            Object::List(items) => {
                out.push('[');
                self.write_items(out, items, active);
                out.push(']');
            }
            Object::Tuple(items) => {
                out.push('(');
                self.write_items(out, items, active);
                if items.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            Object::Dict(d) => {
                out.push('{');
                for (i, (_, (k, val))) in d.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_repr(out, *k, active);
                    out.push_str(": ");
                    self.write_repr(out, *val, active);
                }
                out.push('}');
            }
            Object::Set(s) => {
                if s.is_empty() {
                    out.push_str("set()");
                } else {
                    let keys: Vec<Value> = s.keys().collect();
                    out.push('{');
                    self.write_items(out, &keys, active);
                    out.push('}');
                }
            }
            Object::View { dict, kind } => {
                let d = self.dict_ref(*dict);
                let name = match kind {
                    ViewKind::Keys => "dict_keys",
                    ViewKind::Values => "dict_values",
                    ViewKind::Items => "dict_items",
                };
                out.push_str(name);
                out.push_str("([");
                for (i, (_, (k, val))) in d.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match kind {
                        ViewKind::Keys => self.write_repr(out, *k, active),
                        ViewKind::Values => self.write_repr(out, *val, active),
                        ViewKind::Items => {
                            out.push('(');
                            self.write_repr(out, *k, active);
                            out.push_str(", ");
                            self.write_repr(out, *val, active);
                            out.push(')');
                        }
                    }
                }
                out.push_str("])");
            }
            Object::Range(r) => {
                let _ = if r.step == 1 {
                    write!(out, "range({}, {})", r.start, r.stop)
                } else {
                    write!(out, "range({}, {}, {})", r.start, r.stop, r.step)
                };
            }
            Object::Type(kind) => {
                let _ = write!(out, "<class '{}'>", kind.name());
            }
            Object::Class(class) => {
                let _ = write!(out, "<class '{}'>", class.name);
            }
            Object::Instance(_) => {
                let _ = write!(out, "<{} object>", self.type_name(v));
            }
            Object::Function(f) => {
                let _ = match f.entry {
                    Entry::Compiled(_) => write!(out, "<function {}>", f.name),
                    Entry::Builtin { .. } => write!(out, "<built-in function {}>", f.name),
                    Entry::Method(kind) => write!(
                        out,
                        "<method '{}' of '{}' objects>",
                        kind.name(),
                        kind.owner().name()
                    ),
                };
            }
            Object::BoundMethod { receiver, func } => {
                let name = match self.object(*func) {
                    Object::Function(f) => match f.entry {
                        Entry::Method(kind) => kind.name().to_string(),
                        _ => f.name.to_string(),
                    },
                    _ => "?".to_string(),
                };
                let _ = write!(out, "<bound method {}.{}>", self.type_name(*receiver), name);
            }
            Object::File(f) => {
                let _ = write!(out, "<file '{}'>", f.path);
            }
            Object::Iter(_) => {
                let _ = write!(out, "<{} object>", self.type_name(v));
            }
            Object::Context(_) => out.push_str("<context>"),
        }
        if container {
            active.pop();
        }
    }

    /// printf-style `fmt % args`. A tuple supplies one argument per
    /// conversion; any other value is a single argument.
    pub fn percent_format(&self, fmt: &str, args: Value) -> RunResult<String> {
        let args: Vec<Value> = match self.object(args) {
            Object::Tuple(items) => items.to_vec(),
            _ => vec![args],
        };
        let mut next = args.into_iter();
        let mut out = String::with_capacity(fmt.len());
        let mut chars = fmt.chars();
        let missing = || Fatal::new(DiagnosticKind::InvalidValue("not enough arguments for format string".into()));
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => out.push('%'),
                Some('s') => {
                    let v = next.next().ok_or_else(missing)?;
                    out.push_str(&self.str_of(v));
                }
                Some('r') => {
                    let v = next.next().ok_or_else(missing)?;
                    out.push_str(&self.repr(v));
                }
                Some('d') | Some('i') => {
                    let v = next.next().ok_or_else(missing)?;
                    push_int(&mut out, self.expect_int(v, "%d format")?);
                }
                Some('x') => {
                    let v = next.next().ok_or_else(missing)?;
                    let n = self.expect_int(v, "%x format")?;
                    if n < 0 {
                        let _ = write!(out, "-{:x}", n.unsigned_abs());
                    } else {
                        let _ = write!(out, "{n:x}");
                    }
                }
                Some(other) => {
                    return Err(Fatal::new(DiagnosticKind::InvalidValue(format!(
                        "unsupported format character '{other}'"
                    ))));
                }
                None => {
                    return Err(Fatal::new(DiagnosticKind::InvalidValue("incomplete format".into())));
                }
            }
        }
        if next.next().is_some() {
            return Err(Fatal::new(DiagnosticKind::InvalidValue(
                "not all arguments converted during string formatting".into(),
            )));
        }
        Ok(out)
    }
}
