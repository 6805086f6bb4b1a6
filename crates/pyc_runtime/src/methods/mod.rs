use crate::Runtime;
use crate::core::{TypeKind, Value};
use pyc_core::RunResult;

mod bytes;
mod common;
mod dict;
mod file;
mod list;
mod set;
mod str;
mod tuple;

/// Every builtin method of every builtin variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    DictClear,
    DictCopy,
    DictGet,
    DictKeys,
    DictItems,
    DictValues,
    DictPop,
    DictUpdate,
    ListAppend,
    ListCount,
    ListExtend,
    ListIndex,
    ListInsert,
    ListPop,
    ListRemove,
    ListReverse,
    ListSort,
    ListClear,
    ListCopy,
    SetAdd,
    SetClear,
    SetCopy,
    SetDifferenceUpdate,
    SetDiscard,
    SetRemove,
    SetUpdate,
    StrJoin,
    StrSplit,
    StrStartswith,
    StrEndswith,
    StrUpper,
    StrLower,
    StrStrip,
    TupleCount,
    TupleIndex,
    BytesDecode,
    FileRead,
    FileWrite,
    FileClose,
}

impl MethodKind {
    pub const ALL: &'static [MethodKind] = &[
        MethodKind::DictClear,
        MethodKind::DictCopy,
        MethodKind::DictGet,
        MethodKind::DictKeys,
        MethodKind::DictItems,
        MethodKind::DictValues,
        MethodKind::DictPop,
        MethodKind::DictUpdate,
        MethodKind::ListAppend,
        MethodKind::ListCount,
        MethodKind::ListExtend,
        MethodKind::ListIndex,
        MethodKind::ListInsert,
        MethodKind::ListPop,
        MethodKind::ListRemove,
        MethodKind::ListReverse,
        MethodKind::ListSort,
        MethodKind::ListClear,
        MethodKind::ListCopy,
        MethodKind::SetAdd,
        MethodKind::SetClear,
        MethodKind::SetCopy,
        MethodKind::SetDifferenceUpdate,
        MethodKind::SetDiscard,
        MethodKind::SetRemove,
        MethodKind::SetUpdate,
        MethodKind::StrJoin,
        MethodKind::StrSplit,
        MethodKind::StrStartswith,
        MethodKind::StrEndswith,
        MethodKind::StrUpper,
        MethodKind::StrLower,
        MethodKind::StrStrip,
        MethodKind::TupleCount,
        MethodKind::TupleIndex,
        MethodKind::BytesDecode,
        MethodKind::FileRead,
        MethodKind::FileWrite,
        MethodKind::FileClose,
    ];

    /// Resolve attribute `name` against the whitelist of `owner`.
    pub fn lookup(owner: TypeKind, name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.owner() == owner && m.name() == name)
    }

    pub fn owner(self) -> TypeKind {
        use MethodKind::*;
        match self {
            DictClear | DictCopy | DictGet | DictKeys | DictItems | DictValues | DictPop
            | DictUpdate => TypeKind::Dict,
            ListAppend | ListCount | ListExtend | ListIndex | ListInsert | ListPop | ListRemove
            | ListReverse | ListSort | ListClear | ListCopy => TypeKind::List,
            SetAdd | SetClear | SetCopy | SetDifferenceUpdate | SetDiscard | SetRemove
            | SetUpdate => TypeKind::Set,
            StrJoin | StrSplit | StrStartswith | StrEndswith | StrUpper | StrLower | StrStrip => {
                TypeKind::Str
            }
            TupleCount | TupleIndex => TypeKind::Tuple,
            BytesDecode => TypeKind::Bytes,
            FileRead | FileWrite | FileClose => TypeKind::File,
        }
    }

    pub fn name(self) -> &'static str {
        use MethodKind::*;
        match self {
            DictClear | ListClear | SetClear => "clear",
            DictCopy | ListCopy | SetCopy => "copy",
            DictGet => "get",
            DictKeys => "keys",
            DictItems => "items",
            DictValues => "values",
            DictPop | ListPop => "pop",
            DictUpdate | SetUpdate => "update",
            ListAppend => "append",
            ListCount | TupleCount => "count",
            ListExtend => "extend",
            ListIndex | TupleIndex => "index",
            ListInsert => "insert",
            ListRemove | SetRemove => "remove",
            ListReverse => "reverse",
            ListSort => "sort",
            SetAdd => "add",
            SetDifferenceUpdate => "difference_update",
            SetDiscard => "discard",
            StrJoin => "join",
            StrSplit => "split",
            StrStartswith => "startswith",
            StrEndswith => "endswith",
            StrUpper => "upper",
            StrLower => "lower",
            StrStrip => "strip",
            BytesDecode => "decode",
            FileRead => "read",
            FileWrite => "write",
            FileClose => "close",
        }
    }

    /// `owner.name`, as used in diagnostics.
    pub fn qualified_name(self) -> String {
        format!("{}.{}", self.owner().name(), self.name())
    }
}

/// Run `kind` on `recv`, which must be an instance of the method's owner.
pub(crate) fn dispatch(
    rt: &mut Runtime,
    recv: Value,
    kind: MethodKind,
    args: &[Value],
) -> RunResult<Value> {
    common::expect_receiver(rt, recv, kind)?;
    match kind.owner() {
        TypeKind::Dict => dict::dispatch(rt, recv, kind, args),
        TypeKind::List => list::dispatch(rt, recv, kind, args),
        TypeKind::Set => set::dispatch(rt, recv, kind, args),
        TypeKind::Str => str::dispatch(rt, recv, kind, args),
        TypeKind::Tuple => tuple::dispatch(rt, recv, kind, args),
        TypeKind::Bytes => bytes::dispatch(rt, recv, kind, args),
        TypeKind::File => file::dispatch(rt, recv, kind, args),
        other => unreachable!("no methods registered for {}", other.name()),
    }
}
