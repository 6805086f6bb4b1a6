//! Attribute resolution and method binding.

use crate::Runtime;
use crate::core::{Entry, Object, TypeKind, Value};
use crate::methods::MethodKind;
use pyc_core::{DiagnosticKind, Fatal, RunResult};

enum Found {
    Value(Value),
    Bind(Value),
    Name(String),
    Builtin(MethodKind),
}

impl Runtime {
    /// Class of `v`: the user class of an instance, otherwise the builtin
    /// type object.
    pub fn type_of(&self, v: Value) -> Value {
        match self.object(v) {
            Object::Instance(inst) => inst.class,
            Object::Context(_) => unreachable!("contexts are not program values"),
            obj => self.type_object(obj.kind().unwrap_or(TypeKind::Type)),
        }
    }

    /// `obj.name`.
    ///
    /// Instances look in their own attributes first, then in the class,
    /// binding function members on the way out. Builtin values resolve
    /// against the method table of their type.
    pub fn getattr(&mut self, obj: Value, name: &str) -> RunResult<Value> {
        if name == "__class__" {
            return Ok(self.type_of(obj));
        }
        let found = match self.object(obj) {
            Object::Instance(inst) => match inst.attrs.get(name) {
                Some(&v) => Some(Found::Value(v)),
                None => match self.object(inst.class) {
                    Object::Class(class) => class.members.get(name).map(|&member| {
                        if matches!(self.object(member), Object::Function(_)) {
                            Found::Bind(member)
                        } else {
                            Found::Value(member)
                        }
                    }),
                    _ => None,
                },
            },
            Object::Class(class) if name == "__name__" => Some(Found::Name(class.name.to_string())),
            Object::Class(class) => class.members.get(name).copied().map(Found::Value),
            Object::Type(kind) if name == "__name__" => Some(Found::Name(kind.name().to_string())),
            Object::Type(kind) => MethodKind::lookup(*kind, name).map(|m| Found::Value(self.methods[&m])),
            Object::Function(f) if name == "__name__" => Some(Found::Name(match f.entry {
                Entry::Method(kind) => kind.name().to_string(),
                _ => f.name.to_string(),
            })),
            obj => obj
                .kind()
                .and_then(|kind| MethodKind::lookup(kind, name))
                .map(Found::Builtin),
        };
        match found {
            Some(Found::Value(v)) => Ok(v),
            Some(Found::Bind(func)) => self.new_bound_method(obj, func),
            Some(Found::Name(s)) => self.new_str(s),
            Some(Found::Builtin(kind)) => {
                let func = self.methods[&kind];
                self.new_bound_method(obj, func)
            }
            None => Err(Fatal::new(DiagnosticKind::UnknownAttribute {
                ty: self.type_name(obj),
                attr: name.to_string(),
            })),
        }
    }

    /// `obj.name = value`. Only instances and classes carry attributes.
    pub fn setattr(&mut self, obj: Value, name: &str, value: Value) -> RunResult<()> {
        let settable = matches!(self.object(obj), Object::Instance(_) | Object::Class(_));
        if !settable || name == "__class__" {
            return Err(self.unimplemented("setattr", obj));
        }
        match self.object_mut(obj) {
            Object::Instance(inst) => {
                inst.attrs.insert(name.into(), value);
            }
            Object::Class(class) => {
                class.members.insert(name.into(), value);
            }
            _ => {}
        }
        Ok(())
    }
}
