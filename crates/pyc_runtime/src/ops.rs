//! Operator protocol: arithmetic, bitwise, comparison, truth and hashing.
//!
//! Every binary operator dispatches on the left operand. A combination no
//! variant implements is a fatal error naming the operator and the operand
//! types; nothing is ever coerced silently.

use crate::Runtime;
use crate::core::{Object, Value};
use pyc_core::hash::{Fnv1a, fnv1a};
use pyc_core::{DiagnosticKind, Fatal, RunResult};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    And,
    Divmod,
    FloorDiv,
    LShift,
    Mod,
    Mul,
    Or,
    Pow,
    RShift,
    Sub,
    TrueDiv,
    Xor,
}

impl BinOp {
    pub fn name(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::And => "and",
            BinOp::Divmod => "divmod",
            BinOp::FloorDiv => "floordiv",
            BinOp::LShift => "lshift",
            BinOp::Mod => "mod",
            BinOp::Mul => "mul",
            BinOp::Or => "or",
            BinOp::Pow => "pow",
            BinOp::RShift => "rshift",
            BinOp::Sub => "sub",
            BinOp::TrueDiv => "truediv",
            BinOp::Xor => "xor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn name(self) -> &'static str {
        match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::Lt => "lt",
            CmpOp::Le => "le",
            CmpOp::Gt => "gt",
            CmpOp::Ge => "ge",
        }
    }

    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Invert,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Invert => "invert",
        }
    }
}

enum Produced {
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
}

fn overflow(op: &'static str) -> Fatal {
    Fatal::new(DiagnosticKind::IntegerOverflow(op))
}

fn floor_div(a: i64, b: i64) -> RunResult<i64> {
    if b == 0 {
        return Err(Fatal::new(DiagnosticKind::DivisionByZero));
    }
    let q = a.checked_div(b).ok_or_else(|| overflow("floordiv"))?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn floor_mod(a: i64, b: i64) -> RunResult<i64> {
    if b == 0 {
        return Err(Fatal::new(DiagnosticKind::DivisionByZero));
    }
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn int_pow(a: i64, b: i64) -> RunResult<i64> {
    if b < 0 {
        return Err(Fatal::new(DiagnosticKind::NegativeExponent));
    }
    match u32::try_from(b) {
        Ok(exp) => a.checked_pow(exp).ok_or_else(|| overflow("pow")),
        Err(_) => match a {
            0 | 1 => Ok(a),
            -1 => Ok(if b % 2 == 0 { 1 } else { -1 }),
            _ => Err(overflow("pow")),
        },
    }
}

fn shift_left(a: i64, b: i64) -> RunResult<i64> {
    if b < 0 {
        return Err(Fatal::new(DiagnosticKind::NegativeShift));
    }
    if a == 0 {
        return Ok(0);
    }
    if b >= 64 {
        return Err(overflow("lshift"));
    }
    let shifted = a << b;
    if shifted >> b != a {
        return Err(overflow("lshift"));
    }
    Ok(shifted)
}

fn shift_right(a: i64, b: i64) -> RunResult<i64> {
    if b < 0 {
        return Err(Fatal::new(DiagnosticKind::NegativeShift));
    }
    Ok(if b >= 64 { if a < 0 { -1 } else { 0 } } else { a >> b })
}

/// Largest buffer a single sequence operation may request.
pub(crate) const MAX_SEQUENCE_BYTES: usize = 1 << 32;

/// Element count of a result built from `count` elements of `T`, refused
/// when it would exceed [`MAX_SEQUENCE_BYTES`].
pub(crate) fn sized<T>(count: usize, what: &str) -> RunResult<usize> {
    match count.checked_mul(std::mem::size_of::<T>().max(1)) {
        Some(bytes) if bytes <= MAX_SEQUENCE_BYTES => Ok(count),
        _ => Err(Fatal::new(DiagnosticKind::InvalidValue(format!("{what} is too large")))),
    }
}

fn repeat<T: Clone>(items: &[T], n: i64) -> RunResult<Vec<T>> {
    if n <= 0 || items.is_empty() {
        return Ok(Vec::new());
    }
    let total = items
        .len()
        .checked_mul(n as usize)
        .ok_or_else(|| overflow("mul"))?;
    let total = sized::<T>(total, "repeated sequence")?;
    let mut out = Vec::with_capacity(total);
    for _ in 0..n {
        out.extend_from_slice(items);
    }
    Ok(out)
}

impl Runtime {
    pub(crate) fn unsupported(&self, op: &'static str, lhs: Value, rhs: Value) -> Fatal {
        Fatal::new(DiagnosticKind::BinaryUnsupported {
            op,
            lhs: self.type_name(lhs),
            rhs: self.type_name(rhs),
        })
    }

    pub(crate) fn unimplemented(&self, op: &'static str, v: Value) -> Fatal {
        Fatal::new(DiagnosticKind::Unimplemented {
            op,
            ty: self.type_name(v),
        })
    }

    // ---- truth, equality, hashing ----

    /// Truth value of `v`: nonzero integers, nonempty containers, `True`
    /// and every object reference are true.
    pub fn truthy(&self, v: Value) -> bool {
        match self.object(v) {
            Object::None => false,
            Object::Bool(b) => *b,
            Object::Int(n) => *n != 0,
            Object::Str(s) => !s.value.is_empty(),
            Object::Bytes(b) => !b.is_empty(),
            Object::List(items) => !items.is_empty(),
            Object::Tuple(items) => !items.is_empty(),
            Object::Dict(d) => !d.is_empty(),
            Object::Set(s) => !s.is_empty(),
            Object::Range(r) => !r.is_empty(),
            Object::View { dict, .. } => !self.dict_ref(*dict).is_empty(),
            _ => true,
        }
    }

    fn seq_equal(&self, a: &[Value], b: &[Value]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.values_equal(*x, *y))
    }

    /// Structural equality used by container lookups. Total: values of
    /// unrelated types are never equal.
    pub fn values_equal(&self, a: Value, b: Value) -> bool {
        if a.is(b) {
            return true;
        }
        match (self.object(a), self.object(b)) {
            (Object::Int(_) | Object::Bool(_), Object::Int(_) | Object::Bool(_)) => {
                self.as_int(a) == self.as_int(b)
            }
            (Object::Str(x), Object::Str(y)) => x.value == y.value,
            (Object::Bytes(x), Object::Bytes(y)) => x == y,
            (Object::List(x), Object::List(y)) => self.seq_equal(x, y),
            (Object::Tuple(x), Object::Tuple(y)) => self.seq_equal(x, y),
            (Object::Dict(x), Object::Dict(y)) => {
                x.len() == y.len()
                    && x.iter().all(|(_, (k, v))| {
                        matches!(self.dict_lookup(b, *k), Ok(Some(w)) if self.values_equal(*v, w))
                    })
            }
            (Object::Set(x), Object::Set(y)) => {
                x.len() == y.len() && x.keys().all(|k| self.set_contains(b, k).unwrap_or(false))
            }
            (Object::Range(x), Object::Range(y)) => {
                let len = x.len();
                len == y.len()
                    && (len == 0 || (x.start == y.start && (len == 1 || x.step == y.step)))
            }
            (
                Object::BoundMethod { receiver: r1, func: f1 },
                Object::BoundMethod { receiver: r2, func: f2 },
            ) => r1.is(*r2) && f1.is(*f2),
            _ => false,
        }
    }

    /// 64-bit hash used to key Dict and Set storage.
    pub fn hash_of(&self, v: Value) -> RunResult<u64> {
        match self.object(v) {
            Object::Int(n) => Ok(*n as u64),
            Object::Bool(b) => Ok(*b as u64),
            Object::None => Ok(fnv1a(b"None")),
            Object::Str(s) => Ok(s.hash.unwrap_or_else(|| fnv1a(s.value.as_bytes()))),
            Object::Bytes(b) => Ok(fnv1a(b)),
            Object::Tuple(items) => {
                let mut h = Fnv1a::new();
                for &item in items.iter() {
                    h.write_u64(self.hash_of(item)?);
                }
                Ok(h.finish())
            }
            Object::Type(_) | Object::Class(_) | Object::Function(_) => {
                let id = v.id();
                let mut h = Fnv1a::new();
                h.write(&[id.class()]);
                h.write(&id.block().to_le_bytes());
                h.write(&id.slot().to_le_bytes());
                h.write(&id.generation().to_le_bytes());
                Ok(h.finish())
            }
            _ => Err(Fatal::new(DiagnosticKind::Unhashable(self.type_name(v)))),
        }
    }

    // ---- binary operators ----

    pub fn binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> RunResult<Value> {
        if let (Some(a), Some(b)) = (self.as_int(lhs), self.as_int(rhs)) {
            let both_bool = self.is_bool(lhs) && self.is_bool(rhs);
            return self.int_binary(op, lhs, rhs, a, b, both_bool);
        }
        if let Some(v) = self.sequence_binary(op, lhs, rhs)? {
            return Ok(v);
        }
        if op == BinOp::Mod {
            if let Some(fmt) = self.as_str(lhs) {
                let fmt = fmt.to_string();
                let text = self.percent_format(&fmt, rhs)?;
                return self.new_str(text);
            }
        }
        if self.is_set(lhs) && self.is_set(rhs) {
            if let Some(v) = self.set_binary(op, lhs, rhs)? {
                return Ok(v);
            }
        }
        Err(self.unsupported(op.name(), lhs, rhs))
    }

    fn int_binary(
        &mut self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
        a: i64,
        b: i64,
        both_bool: bool,
    ) -> RunResult<Value> {
        let n = match op {
            BinOp::Add => a.checked_add(b).ok_or_else(|| overflow("add"))?,
            BinOp::Sub => a.checked_sub(b).ok_or_else(|| overflow("sub"))?,
            BinOp::Mul => a.checked_mul(b).ok_or_else(|| overflow("mul"))?,
            BinOp::FloorDiv => floor_div(a, b)?,
            BinOp::Mod => floor_mod(a, b)?,
            BinOp::Pow => int_pow(a, b)?,
            BinOp::LShift => shift_left(a, b)?,
            BinOp::RShift => shift_right(a, b)?,
            BinOp::And => a & b,
            BinOp::Or => a | b,
            BinOp::Xor => a ^ b,
            BinOp::TrueDiv | BinOp::Divmod => return Err(self.unsupported(op.name(), lhs, rhs)),
        };
        if both_bool && matches!(op, BinOp::And | BinOp::Or | BinOp::Xor) {
            return Ok(self.create_bool_const(n != 0));
        }
        self.new_int(n)
    }

    fn sequence_binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> RunResult<Option<Value>> {
        let produced = match (op, self.object(lhs), self.object(rhs)) {
            (BinOp::Add, Object::Str(a), Object::Str(b)) => {
                let mut s = String::with_capacity(a.value.len() + b.value.len());
                s.push_str(&a.value);
                s.push_str(&b.value);
                Produced::Str(s)
            }
            (BinOp::Add, Object::Bytes(a), Object::Bytes(b)) => Produced::Bytes([&a[..], &b[..]].concat()),
            (BinOp::Add, Object::List(a), Object::List(b)) => Produced::List([&a[..], &b[..]].concat()),
            (BinOp::Add, Object::Tuple(a), Object::Tuple(b)) => {
                Produced::Tuple([&a[..], &b[..]].concat())
            }
            (BinOp::Mul, seq, Object::Int(_) | Object::Bool(_)) => {
                let Some(n) = self.as_int(rhs) else { return Ok(None) };
                match Self::repeat_seq(seq, n)? {
                    Some(p) => p,
                    None => return Ok(None),
                }
            }
            (BinOp::Mul, Object::Int(_) | Object::Bool(_), seq) => {
                let Some(n) = self.as_int(lhs) else { return Ok(None) };
                match Self::repeat_seq(seq, n)? {
                    Some(p) => p,
                    None => return Ok(None),
                }
            }
            _ => return Ok(None),
        };
        let v = match produced {
            Produced::Str(s) => self.new_str(s)?,
            Produced::Bytes(b) => self.new_bytes(b)?,
            Produced::List(items) => self.new_list(items)?,
            Produced::Tuple(items) => self.new_tuple(items)?,
        };
        Ok(Some(v))
    }

    fn repeat_seq(seq: &Object, n: i64) -> RunResult<Option<Produced>> {
        Ok(Some(match seq {
            Object::Str(s) => {
                if n <= 0 {
                    Produced::Str(String::new())
                } else {
                    let total = s.value.len().checked_mul(n as usize).ok_or_else(|| overflow("mul"))?;
                    let total = sized::<u8>(total, "repeated sequence")?;
                    let mut out = String::with_capacity(total);
                    for _ in 0..n {
                        out.push_str(&s.value);
                    }
                    Produced::Str(out)
                }
            }
            Object::Bytes(b) => Produced::Bytes(repeat(b, n)?),
            Object::List(items) => Produced::List(repeat(items, n)?),
            Object::Tuple(items) => Produced::Tuple(repeat(items, n)?),
            _ => return Ok(None),
        }))
    }

    fn set_binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> RunResult<Option<Value>> {
        let left = self.set_keys(lhs);
        let right = self.set_keys(rhs);
        let mut keep = Vec::new();
        match op {
            BinOp::Or => {
                keep.extend_from_slice(&left);
                keep.extend_from_slice(&right);
            }
            BinOp::And => {
                for k in left {
                    if self.set_contains(rhs, k)? {
                        keep.push(k);
                    }
                }
            }
            BinOp::Sub => {
                for k in left {
                    if !self.set_contains(rhs, k)? {
                        keep.push(k);
                    }
                }
            }
            BinOp::Xor => {
                for k in left {
                    if !self.set_contains(rhs, k)? {
                        keep.push(k);
                    }
                }
                for k in right {
                    if !self.set_contains(lhs, k)? {
                        keep.push(k);
                    }
                }
            }
            _ => return Ok(None),
        }
        self.new_set_from(&keep).map(Some)
    }

    // ---- comparisons ----

    /// Unboxed comparison predicate. `==` and `!=` are only defined between
    /// values of the same variant, with Bool counting as Int.
    pub fn compare_pred(&self, op: CmpOp, a: Value, b: Value) -> RunResult<bool> {
        match op {
            CmpOp::Eq | CmpOp::Ne => {
                if !self.equality_defined(a, b) {
                    return Err(self.unsupported(op.name(), a, b));
                }
                Ok(self.values_equal(a, b) == (op == CmpOp::Eq))
            }
            _ => self.ordering(op, a, b),
        }
    }

    fn equality_defined(&self, a: Value, b: Value) -> bool {
        if self.as_int(a).is_some() && self.as_int(b).is_some() {
            return true;
        }
        std::mem::discriminant(self.object(a)) == std::mem::discriminant(self.object(b))
    }

    /// Comparison boxed as one of the Boolean singletons.
    pub fn compare(&self, op: CmpOp, a: Value, b: Value) -> RunResult<Value> {
        Ok(self.create_bool_const(self.compare_pred(op, a, b)?))
    }

    pub fn less_than(&self, a: Value, b: Value) -> RunResult<bool> {
        self.ordering(CmpOp::Lt, a, b)
    }

    fn ordering(&self, op: CmpOp, a: Value, b: Value) -> RunResult<bool> {
        if let (Some(x), Some(y)) = (self.as_int(a), self.as_int(b)) {
            return Ok(op.holds(x.cmp(&y)));
        }
        match (self.object(a), self.object(b)) {
            (Object::Str(x), Object::Str(y)) => Ok(op.holds(x.value.cmp(&y.value))),
            (Object::Bytes(x), Object::Bytes(y)) => Ok(op.holds(x.cmp(y))),
            (Object::List(x), Object::List(y)) => self.seq_ordering(op, x, y),
            (Object::Tuple(x), Object::Tuple(y)) => self.seq_ordering(op, x, y),
            (Object::Set(x), Object::Set(y)) => {
                let (lx, ly) = (x.len(), y.len());
                let subset = |small: Value, big: Value| -> RunResult<bool> {
                    for k in self.set_ref(small).keys() {
                        if !self.set_contains(big, k)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                };
                Ok(match op {
                    CmpOp::Lt => lx < ly && subset(a, b)?,
                    CmpOp::Le => lx <= ly && subset(a, b)?,
                    CmpOp::Gt => lx > ly && subset(b, a)?,
                    CmpOp::Ge => lx >= ly && subset(b, a)?,
                    CmpOp::Eq | CmpOp::Ne => unreachable!("equality handled by compare_pred"),
                })
            }
            _ => Err(self.unsupported(op.name(), a, b)),
        }
    }

    /// Stable merge sort ordered by `<`. A pair that cannot be ordered is fatal.
    pub fn sorted_values(&self, items: &[Value]) -> RunResult<Vec<Value>> {
        if items.len() <= 1 {
            return Ok(items.to_vec());
        }
        let (left, right) = items.split_at(items.len() / 2);
        let left = self.sorted_values(left)?;
        let right = self.sorted_values(right)?;
        let mut out = Vec::with_capacity(items.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            if self.less_than(right[j], left[i])? {
                out.push(right[j]);
                j += 1;
            } else {
                out.push(left[i]);
                i += 1;
            }
        }
        out.extend_from_slice(&left[i..]);
        out.extend_from_slice(&right[j..]);
        Ok(out)
    }

    fn seq_ordering(&self, op: CmpOp, x: &[Value], y: &[Value]) -> RunResult<bool> {
        for (a, b) in x.iter().zip(y) {
            if !self.values_equal(*a, *b) {
                return self.compare_pred(op, *a, *b);
            }
        }
        Ok(op.holds(x.len().cmp(&y.len())))
    }

    // ---- unary ----

    pub fn unary(&mut self, op: UnaryOp, v: Value) -> RunResult<Value> {
        if op == UnaryOp::Not {
            return Ok(self.create_bool_const(!self.truthy(v)));
        }
        let Some(n) = self.as_int(v) else {
            return Err(self.unimplemented(op.name(), v));
        };
        let result = match op {
            UnaryOp::Neg => n.checked_neg().ok_or_else(|| overflow("neg"))?,
            UnaryOp::Pos => n,
            UnaryOp::Invert => !n,
            UnaryOp::Not => unreachable!(),
        };
        self.new_int(result)
    }

    // ---- membership ----

    /// `item in container`.
    pub fn contains_pred(&self, container: Value, item: Value) -> RunResult<bool> {
        match self.object(container) {
            Object::Str(s) => match self.as_str(item) {
                Some(needle) => Ok(s.value.contains(needle)),
                None => Err(self.unsupported("contains", container, item)),
            },
            Object::Bytes(hay) => match self.object(item) {
                Object::Bytes(needle) => Ok(needle.is_empty()
                    || hay.windows(needle.len()).any(|w| w == needle.as_slice())),
                Object::Int(n) => Ok(hay.iter().any(|&b| b as i64 == *n)),
                _ => Err(self.unsupported("contains", container, item)),
            },
            Object::List(items) => Ok(items.iter().any(|x| self.values_equal(*x, item))),
            Object::Tuple(items) => Ok(items.iter().any(|x| self.values_equal(*x, item))),
            Object::Dict(_) => Ok(self.dict_lookup(container, item)?.is_some()),
            Object::Set(_) => self.set_contains(container, item),
            Object::Range(r) => Ok(match self.object(item) {
                Object::Int(n) => r.contains(*n),
                Object::Bool(b) => r.contains(*b as i64),
                _ => false,
            }),
            Object::View { dict, kind } => {
                let dict = *dict;
                match kind {
                    crate::core::ViewKind::Keys => Ok(self.dict_lookup(dict, item)?.is_some()),
                    crate::core::ViewKind::Values => {
                        Ok(self.dict_ref(dict).values().any(|v| self.values_equal(v, item)))
                    }
                    crate::core::ViewKind::Items => match self.as_seq(item) {
                        Some([k, v]) if self.is_tuple(item) => Ok(self
                            .dict_lookup(dict, *k)?
                            .is_some_and(|stored| self.values_equal(stored, *v))),
                        _ => Ok(false),
                    },
                }
            }
            _ => Err(self.unimplemented("contains", container)),
        }
    }

    pub fn contains(&self, container: Value, item: Value) -> RunResult<Value> {
        Ok(self.create_bool_const(self.contains_pred(container, item)?))
    }

    pub fn not_contains(&self, container: Value, item: Value) -> RunResult<Value> {
        Ok(self.create_bool_const(!self.contains_pred(container, item)?))
    }
}
