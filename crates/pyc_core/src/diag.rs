//! Fatal diagnostics.
//!
//! Every way a compiled program can die is one [`DiagnosticKind`]; the text a
//! user sees is produced by [`DiagnosticsFormatter`] and is always one line.

use crate::arena::AllocError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    // Unsupported operations
    Unimplemented {
        op: &'static str,
        ty: String,
    },
    BinaryUnsupported {
        op: &'static str,
        lhs: String,
        rhs: String,
    },
    NotCallable(String),
    NotIterable(String),
    Unhashable(String),

    // Argument shape
    ArgumentCount {
        name: String,
        min: usize,
        max: usize,
        actual: usize,
    },
    NoKeywordArgs(String),
    UnexpectedKeyword {
        name: String,
        keyword: String,
    },
    BadArgument {
        name: String,
        expected: &'static str,
        actual: String,
    },
    InvalidLiteral {
        base: u32,
        text: String,
    },
    InvalidValue(String),

    // Lookup failures
    NameNotDefined(String),
    SlotNotDefined(usize),
    KeyNotFound(String),
    UnknownAttribute {
        ty: String,
        attr: String,
    },
    NotInContainer {
        container: &'static str,
        item: String,
    },
    IndexOutOfRange(String),
    EmptyCollection(String),
    IteratorExhausted,

    // Arithmetic
    DivisionByZero,
    IntegerOverflow(&'static str),
    NegativeShift,
    NegativeExponent,

    // Resources
    FileNotFound(String),
    Io(String),
    FileClosed,

    // Allocator
    BadObjectSize(usize),
    ArenaLayout(&'static str),
}

pub struct DiagnosticsFormatter;

impl DiagnosticsFormatter {
    pub fn format(kind: &DiagnosticKind) -> String {
        Self::format_en(kind)
    }

    fn format_en(kind: &DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::Unimplemented { op, ty } => format!("{op} unimplemented for '{ty}'"),
            DiagnosticKind::BinaryUnsupported { op, lhs, rhs } => {
                format!("{op} unimplemented for '{lhs}' and '{rhs}'")
            }
            DiagnosticKind::NotCallable(ty) => format!("'{ty}' object is not callable"),
            DiagnosticKind::NotIterable(ty) => format!("'{ty}' object is not iterable"),
            DiagnosticKind::Unhashable(ty) => format!("unhashable type: '{ty}'"),

            DiagnosticKind::ArgumentCount {
                name,
                min,
                max,
                actual,
            } => {
                if min == max {
                    format!("wrong number of arguments to {name}(): expected {min}, got {actual}")
                } else if actual < min {
                    format!("too few arguments to {name}(): expected at least {min}, got {actual}")
                } else {
                    format!("too many arguments to {name}(): expected at most {max}, got {actual}")
                }
            }
            DiagnosticKind::NoKeywordArgs(name) => {
                format!("{name}() does not take keyword arguments")
            }
            DiagnosticKind::UnexpectedKeyword { name, keyword } => {
                format!("{name}() got an unexpected keyword argument '{keyword}'")
            }
            DiagnosticKind::BadArgument {
                name,
                expected,
                actual,
            } => format!("bad argument to {name}(): expected {expected}, got '{actual}'"),
            DiagnosticKind::InvalidLiteral { base, text } => {
                format!("invalid literal for int() with base {base}: '{text}'")
            }
            DiagnosticKind::InvalidValue(msg) => msg.clone(),

            DiagnosticKind::NameNotDefined(name) => {
                format!("cannot find '{name}' in symbol table")
            }
            DiagnosticKind::SlotNotDefined(idx) => format!("name at slot {idx} is not defined"),
            DiagnosticKind::KeyNotFound(key) => format!("cannot find {key} in dict"),
            DiagnosticKind::UnknownAttribute { ty, attr } => {
                format!("'{ty}' object has no attribute '{attr}'")
            }
            DiagnosticKind::NotInContainer { container, item } => {
                format!("{item} is not in {container}")
            }
            DiagnosticKind::IndexOutOfRange(ty) => format!("{ty} index out of range"),
            DiagnosticKind::EmptyCollection(what) => format!("{what} is empty"),
            DiagnosticKind::IteratorExhausted => "iterator is exhausted".into(),

            DiagnosticKind::DivisionByZero => "integer division or modulo by zero".into(),
            DiagnosticKind::IntegerOverflow(op) => format!("integer overflow in {op}"),
            DiagnosticKind::NegativeShift => "negative shift count".into(),
            DiagnosticKind::NegativeExponent => "negative exponent needs floats".into(),

            DiagnosticKind::FileNotFound(path) => format!("cannot open file '{path}'"),
            DiagnosticKind::Io(msg) => format!("i/o error: {msg}"),
            DiagnosticKind::FileClosed => "I/O operation on closed file".into(),

            DiagnosticKind::BadObjectSize(size) => format!("bad obj size {size}"),
            DiagnosticKind::ArenaLayout(msg) => format!("bad arena layout: {msg}"),
        }
    }
}

/// A condition the program cannot continue from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fatal {
    pub kind: DiagnosticKind,
}

impl Fatal {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self { kind }
    }

    pub fn message(&self) -> String {
        DiagnosticsFormatter::format(&self.kind)
    }
}

impl From<DiagnosticKind> for Fatal {
    fn from(kind: DiagnosticKind) -> Self {
        Self::new(kind)
    }
}

impl From<AllocError> for Fatal {
    fn from(err: AllocError) -> Self {
        match err {
            AllocError::BadSize(size) => Self::new(DiagnosticKind::BadObjectSize(size)),
            AllocError::BadLayout(msg) => Self::new(DiagnosticKind::ArenaLayout(msg)),
        }
    }
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for Fatal {}

pub type RunResult<T> = Result<T, Fatal>;
