use crate::Runtime;
use crate::builtins;
use crate::core::{BuiltinFn, ContextId, Entry, Function, Object, TypeKind};
use pyc_core::RunResult;

enum Registered {
    Function {
        name: &'static str,
        fun: BuiltinFn,
        keywords: &'static [&'static str],
    },
    Class(TypeKind),
}

pub struct BuiltinRegistry {
    entries: Vec<Registered>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, fun: BuiltinFn) {
        self.register_with_keywords(name, fun, &[]);
    }

    pub fn register_with_keywords(
        &mut self,
        name: &'static str,
        fun: BuiltinFn,
        keywords: &'static [&'static str],
    ) {
        self.entries.push(Registered::Function {
            name,
            fun,
            keywords,
        });
    }

    /// Expose a builtin type object under its own name.
    pub fn register_class(&mut self, kind: TypeKind) {
        self.entries.push(Registered::Class(kind));
    }

    pub fn install_into(self, rt: &mut Runtime, ctx: ContextId) -> RunResult<()> {
        for entry in self.entries {
            match entry {
                Registered::Function {
                    name,
                    fun,
                    keywords,
                } => {
                    let func = rt.alloc(Object::Function(Function {
                        name: name.into(),
                        entry: Entry::Builtin { fun, keywords },
                    }))?;
                    rt.store_name(ctx, name, func);
                }
                Registered::Class(kind) => {
                    let class = rt.type_object(kind);
                    rt.store_name(ctx, kind.name(), class);
                }
            }
        }
        Ok(())
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        registry.register("abs", builtins::builtin_abs);
        registry.register("all", builtins::builtin_all);
        registry.register("any", builtins::builtin_any);
        registry.register("chr", builtins::builtin_chr);
        registry.register("hash", builtins::builtin_hash);
        registry.register("isinstance", builtins::builtin_isinstance);
        registry.register("iter", builtins::builtin_iter);
        registry.register("len", builtins::builtin_len);
        registry.register("max", builtins::builtin_max);
        registry.register("min", builtins::builtin_min);
        registry.register("next", builtins::builtin_next);
        registry.register("open", builtins::builtin_open);
        registry.register("ord", builtins::builtin_ord);
        registry.register_with_keywords("print", builtins::builtin_print, &["sep", "end"]);
        registry.register("repr", builtins::builtin_repr);
        registry.register("sorted", builtins::builtin_sorted);
        // classes
        for kind in [
            TypeKind::Bool,
            TypeKind::Bytes,
            TypeKind::Dict,
            TypeKind::Enumerate,
            TypeKind::Int,
            TypeKind::List,
            TypeKind::Range,
            TypeKind::Reversed,
            TypeKind::Set,
            TypeKind::Str,
            TypeKind::Tuple,
            TypeKind::Type,
            TypeKind::Zip,
        ] {
            registry.register_class(kind);
        }
    }
}
