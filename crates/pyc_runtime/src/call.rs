//! Calling convention.
//!
//! Every callable takes a positional argument tuple and an optional keyword
//! dict. Compiled functions receive them untouched together with the global
//! and calling contexts; builtins and methods get the tuple unpacked.

use crate::Runtime;
use crate::builtins;
use crate::core::{ContextId, Entry, Object, TypeKind, Value};
use crate::methods;
use crate::runtime::ArgVec;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

enum Callee {
    Entry {
        name: Box<str>,
        entry: Entry,
        receiver: Option<Value>,
    },
    Class,
    Type(TypeKind),
}

impl Runtime {
    /// `callee(*args, **kwargs)` from code running in `ctx`.
    pub fn call(
        &mut self,
        ctx: ContextId,
        callee: Value,
        args: Value,
        kwargs: Option<Value>,
    ) -> RunResult<Value> {
        let kwargs = kwargs.filter(|&k| !self.is_none(k) && !(self.is_dict(k) && self.dict_ref(k).is_empty()));
        let target = match self.object(callee) {
            Object::Function(f) => Callee::Entry {
                name: f.name.clone(),
                entry: f.entry,
                receiver: None,
            },
            Object::BoundMethod { receiver, func } => match self.object(*func) {
                Object::Function(f) => Callee::Entry {
                    name: f.name.clone(),
                    entry: f.entry,
                    receiver: Some(*receiver),
                },
                _ => return Err(Fatal::new(DiagnosticKind::NotCallable(self.type_name(*func)))),
            },
            Object::Class(_) => Callee::Class,
            Object::Type(kind) => Callee::Type(*kind),
            _ => return Err(Fatal::new(DiagnosticKind::NotCallable(self.type_name(callee)))),
        };
        match target {
            Callee::Entry { name, entry, receiver } => {
                self.call_entry(ctx, &name, entry, receiver, args, kwargs)
            }
            Callee::Class => self.construct_instance(ctx, callee, args, kwargs),
            Callee::Type(kind) => {
                let positional = self.args_of(args);
                builtins::construct(self, kind, &positional, kwargs)
            }
        }
    }

    /// Convenience form of [`Runtime::call`] taking the positional
    /// arguments as a slice.
    pub fn call_values(&mut self, ctx: ContextId, callee: Value, args: &[Value]) -> RunResult<Value> {
        let args = self.new_tuple(args.to_vec())?;
        self.call(ctx, callee, args, None)
    }

    fn call_entry(
        &mut self,
        ctx: ContextId,
        name: &str,
        entry: Entry,
        receiver: Option<Value>,
        args: Value,
        kwargs: Option<Value>,
    ) -> RunResult<Value> {
        match entry {
            Entry::Compiled(fun) => {
                let args = match receiver {
                    Some(recv) => {
                        let mut items = vec![recv];
                        items.extend(self.args_of(args));
                        self.new_tuple(items)?
                    }
                    None => args,
                };
                let globals = self.globals.unwrap_or(ctx);
                fun(self, globals, ctx, args, kwargs)
            }
            Entry::Builtin { fun, keywords } => {
                if let Some(kw) = kwargs {
                    self.check_keywords(name, kw, keywords)?;
                }
                let positional = self.with_receiver(receiver, args);
                fun(self, &positional, kwargs)
            }
            Entry::Method(kind) => {
                if kwargs.is_some() {
                    return Err(Fatal::new(DiagnosticKind::NoKeywordArgs(kind.qualified_name())));
                }
                let positional = self.with_receiver(receiver, args);
                let Some((&recv, rest)) = positional.split_first() else {
                    return Err(Fatal::new(DiagnosticKind::ArgumentCount {
                        name: kind.qualified_name(),
                        min: 1,
                        max: usize::MAX,
                        actual: 0,
                    }));
                };
                methods::dispatch(self, recv, kind, rest)
            }
        }
    }

    fn with_receiver(&self, receiver: Option<Value>, args: Value) -> ArgVec {
        let mut positional = ArgVec::new();
        positional.extend(receiver);
        positional.extend(self.args_of(args));
        positional
    }

    fn check_keywords(&self, name: &str, kwargs: Value, allowed: &[&str]) -> RunResult<()> {
        if !self.is_dict(kwargs) {
            return Err(self.bad_argument(name, "dict", kwargs));
        }
        if allowed.is_empty() {
            return Err(Fatal::new(DiagnosticKind::NoKeywordArgs(name.to_string())));
        }
        for key in self.dict_ref(kwargs).keys() {
            let known = self.as_str(key).is_some_and(|k| allowed.contains(&k));
            if !known {
                return Err(Fatal::new(DiagnosticKind::UnexpectedKeyword {
                    name: name.to_string(),
                    keyword: self.str_of(key),
                }));
            }
        }
        Ok(())
    }

    /// Instantiate a user class: bind every function member onto the new
    /// instance, then run `__init__` if the class has one. The instance is
    /// the result whatever `__init__` returns.
    fn construct_instance(
        &mut self,
        ctx: ContextId,
        class: Value,
        args: Value,
        kwargs: Option<Value>,
    ) -> RunResult<Value> {
        let (class_name, members): (Box<str>, Vec<(Box<str>, Value)>) = match self.object(class) {
            Object::Class(c) => (
                c.name.clone(),
                c.members.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            ),
            _ => return Err(Fatal::new(DiagnosticKind::NotCallable(self.type_name(class)))),
        };
        let inst = self.new_instance(class)?;
        let mut init = None;
        for (name, member) in members {
            if !matches!(self.object(member), Object::Function(_)) {
                continue;
            }
            let bound = self.new_bound_method(inst, member)?;
            if &*name == "__init__" {
                init = Some(bound);
            }
            if let Object::Instance(obj) = self.object_mut(inst) {
                obj.attrs.insert(name, bound);
            }
        }
        match init {
            Some(init) => {
                self.call(ctx, init, args, kwargs)?;
            }
            None => {
                let given = self.args_of(args).len();
                if given > 0 {
                    return Err(Fatal::new(DiagnosticKind::ArgumentCount {
                        name: class_name.into(),
                        min: 0,
                        max: 0,
                        actual: given,
                    }));
                }
                if kwargs.is_some() {
                    return Err(Fatal::new(DiagnosticKind::NoKeywordArgs(class_name.into())));
                }
            }
        }
        tracing::trace!(class = %class_name, "constructed instance");
        Ok(inst)
    }

    /// Split a builtin's arguments into exactly `N` positionals.
    pub(crate) fn exact_args<const N: usize>(&self, name: &str, args: &[Value]) -> RunResult<[Value; N]> {
        <[Value; N]>::try_from(args).map_err(|_| {
            Fatal::new(DiagnosticKind::ArgumentCount {
                name: name.to_string(),
                min: N,
                max: N,
                actual: args.len(),
            })
        })
    }

    /// Keyword argument `key`, if supplied.
    pub(crate) fn keyword(&self, kwargs: Option<Value>, key: &str) -> Option<Value> {
        let kw = kwargs?;
        self.dict_ref(kw)
            .iter()
            .map(|(_, e)| *e)
            .find(|&(k, _)| self.as_str(k) == Some(key))
            .map(|(_, v)| v)
    }
}
