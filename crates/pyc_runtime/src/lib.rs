//! Runtime library for programs compiled by pythonc.
//!
//! Compiled code owns a [`Runtime`] and drives it through a small surface:
//! object constructors, operator dispatch ([`Runtime::binary`],
//! [`Runtime::compare`], ...), attribute and item access, context slot
//! load/store, [`Runtime::call`] and the periodic
//! [`Runtime::collect_garbage`] hook. Every failure is a [`Fatal`]
//! diagnostic; generated code turns it into process exit with [`OrDie`].

#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]

pub mod core;

mod abi;
mod attr;
mod builtins;
pub mod builtins_registry;
mod call;
pub mod config;
mod containers;
mod gc;
mod items;
mod iter;
mod methods;
mod ops;
mod repr;
mod runtime;
mod scope;

pub use abi::OrDie;
pub use builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
pub use config::RuntimeConfig;
pub use crate::core::{ContextId, NativeFn, TypeKind, Value};
pub use gc::GcStats;
pub use methods::MethodKind;
pub use ops::{BinOp, CmpOp, UnaryOp};
pub use runtime::{ArgVec, Runtime};

pub use pyc_core::{DiagnosticKind, Fatal, RunResult};
