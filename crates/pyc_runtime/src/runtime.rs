//! The runtime: heap, process-wide constants and program output.

use crate::config::RuntimeConfig;
use crate::core::{
    Class, ContextId, Entry, Function, Heap, Instance, Iter, NativeFn, Object, Range, Set, Text,
    TypeKind, Value, object::attr_map_new,
};
use crate::gc::GcStats;
use crate::methods::MethodKind;
use pyc_core::arena::ArenaStats;
use pyc_core::hash::fnv1a;
use pyc_core::map::{FastHashMap, fast_map_new};
use pyc_core::{DiagnosticKind, Fatal, RunResult};
use smallvec::SmallVec;
use std::io::{self, Write};

const OUTPUT_FLUSH_THRESHOLD: usize = 8 * 1024;

pub type ArgVec = SmallVec<[Value; 8]>;

pub struct Runtime {
    pub(crate) heap: Heap,
    pub(crate) config: RuntimeConfig,
    none: Value,
    true_value: Value,
    false_value: Value,
    types: Vec<Value>,
    pub(crate) methods: FastHashMap<MethodKind, Value>,
    int_consts: FastHashMap<i64, Value>,
    str_consts: FastHashMap<Box<str>, Value>,
    pub(crate) globals: Option<ContextId>,
    output: String,
    pub(crate) gc_stats: GcStats,
}

impl Runtime {
    pub fn new() -> Self {
        match Self::with_config(RuntimeConfig::default()) {
            Ok(rt) => rt,
            Err(e) => panic!("default runtime configuration rejected: {e}"),
        }
    }

    /// Build a runtime and its permanent objects: the None and Boolean
    /// singletons, one type object per builtin type and one function per
    /// builtin method.
    pub fn with_config(config: RuntimeConfig) -> RunResult<Self> {
        let mut heap = Heap::new(config.arena, config.gc_threshold)?;
        let none = heap.alloc(Object::None)?;
        let true_value = heap.alloc(Object::Bool(true))?;
        let false_value = heap.alloc(Object::Bool(false))?;
        let mut types = Vec::with_capacity(TypeKind::ALL.len());
        for kind in TypeKind::ALL {
            types.push(heap.alloc(Object::Type(kind))?);
        }
        let mut methods = fast_map_new();
        for &kind in MethodKind::ALL {
            let func = heap.alloc(Object::Function(Function {
                name: kind.qualified_name().into(),
                entry: Entry::Method(kind),
            }))?;
            methods.insert(kind, func);
        }
        Ok(Self {
            heap,
            config,
            none,
            true_value,
            false_value,
            types,
            methods,
            int_consts: fast_map_new(),
            str_consts: fast_map_new(),
            globals: None,
            output: String::new(),
            gc_stats: GcStats::default(),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub(crate) fn alloc(&mut self, obj: Object) -> RunResult<Value> {
        self.heap.alloc(obj)
    }

    #[inline]
    pub fn object(&self, v: Value) -> &Object {
        self.heap.get(v)
    }

    #[inline]
    pub(crate) fn object_mut(&mut self, v: Value) -> &mut Object {
        self.heap.get_mut(v)
    }

    /// Values that stay alive for the whole process.
    pub(crate) fn permanent_roots(&self) -> impl Iterator<Item = Value> + '_ {
        [self.none, self.true_value, self.false_value]
            .into_iter()
            .chain(self.types.iter().copied())
            .chain(self.methods.values().copied())
            .chain(self.int_consts.values().copied())
            .chain(self.str_consts.values().copied())
            .chain(self.globals.map(|g| g.as_value()))
    }

    // ---- singletons and constants ----

    #[inline]
    pub fn none(&self) -> Value {
        self.none
    }

    /// One of the two Boolean singletons.
    #[inline]
    pub fn create_bool_const(&self, b: bool) -> Value {
        if b { self.true_value } else { self.false_value }
    }

    pub fn is_none(&self, v: Value) -> bool {
        v.is(self.none)
    }

    pub fn type_object(&self, kind: TypeKind) -> Value {
        self.types[kind.index()]
    }

    /// Process-lifetime integer constant.
    pub fn intern_int(&mut self, n: i64) -> RunResult<Value> {
        if let Some(&v) = self.int_consts.get(&n) {
            return Ok(v);
        }
        let v = self.alloc(Object::Int(n))?;
        self.int_consts.insert(n, v);
        Ok(v)
    }

    /// Process-lifetime string constant carrying its precomputed hash.
    pub fn intern_str(&mut self, s: &str) -> RunResult<Value> {
        if let Some(&v) = self.str_consts.get(s) {
            return Ok(v);
        }
        let v = self.alloc(Object::Str(Text {
            value: s.into(),
            hash: Some(fnv1a(s.as_bytes())),
        }))?;
        self.str_consts.insert(s.into(), v);
        Ok(v)
    }

    // ---- constructors ----

    pub fn new_int(&mut self, n: i64) -> RunResult<Value> {
        self.alloc(Object::Int(n))
    }

    pub fn new_str(&mut self, s: impl Into<Box<str>>) -> RunResult<Value> {
        self.alloc(Object::Str(Text::new(s)))
    }

    pub fn new_bytes(&mut self, bytes: Vec<u8>) -> RunResult<Value> {
        self.alloc(Object::Bytes(bytes))
    }

    pub fn new_list(&mut self, items: Vec<Value>) -> RunResult<Value> {
        self.alloc(Object::List(items))
    }

    pub fn new_tuple(&mut self, items: Vec<Value>) -> RunResult<Value> {
        self.alloc(Object::Tuple(items.into_boxed_slice()))
    }

    pub fn new_dict(&mut self) -> RunResult<Value> {
        self.alloc(Object::Dict(Box::default()))
    }

    pub fn new_dict_from(&mut self, pairs: &[(Value, Value)]) -> RunResult<Value> {
        let dict = self.new_dict()?;
        for &(k, v) in pairs {
            self.dict_insert(dict, k, v)?;
        }
        Ok(dict)
    }

    pub fn new_set(&mut self) -> RunResult<Value> {
        self.alloc(Object::Set(Box::new(Set::new())))
    }

    pub fn new_set_from(&mut self, items: &[Value]) -> RunResult<Value> {
        let set = self.new_set()?;
        for &item in items {
            self.set_insert(set, item)?;
        }
        Ok(set)
    }

    pub fn new_range(&mut self, start: i64, stop: i64, step: i64) -> RunResult<Value> {
        if step == 0 {
            return Err(Fatal::new(DiagnosticKind::InvalidValue(
                "range() arg 3 must not be zero".into(),
            )));
        }
        self.alloc(Object::Range(Range { start, stop, step }))
    }

    pub(crate) fn new_iter(&mut self, it: Iter) -> RunResult<Value> {
        self.alloc(Object::Iter(Box::new(it)))
    }

    /// A compiled function.
    pub fn function_def(&mut self, name: &str, fun: NativeFn) -> RunResult<Value> {
        self.alloc(Object::Function(Function {
            name: name.into(),
            entry: Entry::Compiled(fun),
        }))
    }

    /// A user class whose body bound `members`.
    pub fn new_class(&mut self, name: &str, members: &[(&str, Value)]) -> RunResult<Value> {
        let mut map = attr_map_new();
        for &(k, v) in members {
            map.insert(k.into(), v);
        }
        self.alloc(Object::Class(Box::new(Class {
            name: name.into(),
            members: map,
        })))
    }

    pub(crate) fn new_instance(&mut self, class: Value) -> RunResult<Value> {
        self.alloc(Object::Instance(Box::new(Instance {
            class,
            attrs: attr_map_new(),
        })))
    }

    pub(crate) fn new_bound_method(&mut self, receiver: Value, func: Value) -> RunResult<Value> {
        self.alloc(Object::BoundMethod { receiver, func })
    }

    // ---- capability queries ----

    pub fn is_int(&self, v: Value) -> bool {
        matches!(self.object(v), Object::Int(_))
    }

    pub fn is_bool(&self, v: Value) -> bool {
        matches!(self.object(v), Object::Bool(_))
    }

    pub fn is_str(&self, v: Value) -> bool {
        matches!(self.object(v), Object::Str(_))
    }

    pub fn is_list(&self, v: Value) -> bool {
        matches!(self.object(v), Object::List(_))
    }

    pub fn is_tuple(&self, v: Value) -> bool {
        matches!(self.object(v), Object::Tuple(_))
    }

    pub fn is_dict(&self, v: Value) -> bool {
        matches!(self.object(v), Object::Dict(_))
    }

    pub fn is_set(&self, v: Value) -> bool {
        matches!(self.object(v), Object::Set(_))
    }

    /// Integer value of an Integer or Boolean.
    pub fn as_int(&self, v: Value) -> Option<i64> {
        match self.object(v) {
            Object::Int(n) => Some(*n),
            Object::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_str(&self, v: Value) -> Option<&str> {
        match self.object(v) {
            Object::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self, v: Value) -> Option<&[u8]> {
        match self.object(v) {
            Object::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Elements of a List or Tuple.
    pub fn as_seq(&self, v: Value) -> Option<&[Value]> {
        match self.object(v) {
            Object::List(items) => Some(items),
            Object::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_name(&self, v: Value) -> String {
        match self.object(v) {
            Object::Instance(inst) => match self.object(inst.class) {
                Object::Class(class) => class.name.to_string(),
                _ => "object".to_string(),
            },
            Object::Context(_) => "context".to_string(),
            obj => obj.kind().map_or("object", TypeKind::name).to_string(),
        }
    }

    pub(crate) fn bad_argument(&self, name: &str, expected: &'static str, actual: Value) -> Fatal {
        Fatal::new(DiagnosticKind::BadArgument {
            name: name.to_string(),
            expected,
            actual: self.type_name(actual),
        })
    }

    pub fn expect_int(&self, v: Value, name: &str) -> RunResult<i64> {
        self.as_int(v).ok_or_else(|| self.bad_argument(name, "int", v))
    }

    pub fn expect_str(&self, v: Value, name: &str) -> RunResult<&str> {
        match self.object(v) {
            Object::Str(s) => Ok(s.as_str()),
            _ => Err(self.bad_argument(name, "str", v)),
        }
    }

    /// Positional arguments held by an argument tuple.
    pub fn args_of(&self, args: Value) -> ArgVec {
        match self.object(args) {
            Object::Tuple(items) => items.iter().copied().collect(),
            Object::List(items) => items.iter().copied().collect(),
            _ => panic!("argument pack is not a tuple: {args:?}"),
        }
    }

    // ---- output ----

    pub fn write_output(&mut self, s: &str) {
        self.output.push_str(s);
        if !self.config.capture_output && self.output.len() >= OUTPUT_FLUSH_THRESHOLD {
            let _ = self.flush_output();
        }
    }

    /// Everything written since the last call; only meaningful in capture mode.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn flush_output(&mut self) -> io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        out.write_all(self.output.as_bytes())?;
        out.flush()?;
        self.output.clear();
        Ok(())
    }

    // ---- introspection ----

    pub fn gc_stats(&self) -> GcStats {
        GcStats {
            pending_allocs: self.heap.alloc_count,
            ..self.gc_stats.clone()
        }
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.heap.stats()
    }

    /// Whether `v` still names a live object.
    pub fn is_valid(&self, v: Value) -> bool {
        self.heap.is_valid(v)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if !self.config.capture_output {
            let _ = self.flush_output();
        }
    }
}
