mod common;

use common::{call_builtin, int_list, message, runtime};

#[test]
fn print_honours_sep_and_end() {
    let (mut rt, ctx) = runtime();
    let a = rt.new_str("a").unwrap();
    let one = rt.new_int(1).unwrap();
    let list = int_list(&mut rt, &[1, 2]);
    call_builtin(&mut rt, ctx, "print", &[a, one, list]).unwrap();

    let print = rt.load_name(ctx, "print").unwrap();
    let args = rt.new_tuple(vec![a, one]).unwrap();
    let sep_key = rt.new_str("sep").unwrap();
    let sep = rt.new_str(", ").unwrap();
    let end_key = rt.new_str("end").unwrap();
    let end = rt.new_str("!\n").unwrap();
    let kwargs = rt.new_dict_from(&[(sep_key, sep), (end_key, end)]).unwrap();
    rt.call(ctx, print, args, Some(kwargs)).unwrap();

    assert_eq!(rt.take_output(), "a 1 [1, 2]\na, 1!\n");
}

#[test]
fn unknown_keyword_is_fatal() {
    let (mut rt, ctx) = runtime();
    let print = rt.load_name(ctx, "print").unwrap();
    let args = rt.new_tuple(Vec::new()).unwrap();
    let key = rt.new_str("file").unwrap();
    let none = rt.none();
    let kwargs = rt.new_dict_from(&[(key, none)]).unwrap();
    let err = rt.call(ctx, print, args, Some(kwargs)).unwrap_err();
    assert_eq!(message(err), "print() got an unexpected keyword argument 'file'");

    let len = rt.load_name(ctx, "len").unwrap();
    let err = rt.call(ctx, len, args, Some(kwargs)).unwrap_err();
    assert_eq!(message(err), "len() does not take keyword arguments");
}

#[test]
fn module_context_is_populated() {
    let (mut rt, ctx) = runtime();
    let name = rt.load_name(ctx, "__name__").unwrap();
    assert_eq!(rt.as_str(name), Some("__main__"));
    let args = rt.load_name(ctx, "__args__").unwrap();
    assert_eq!(rt.repr(args), "['prog', 'input.txt']");
    for builtin in ["abs", "len", "print", "sorted", "dict", "zip", "type"] {
        assert!(rt.load_name(ctx, builtin).is_ok(), "{builtin}");
    }
    let err = rt.load_name(ctx, "undefined_thing").unwrap_err();
    assert_eq!(message(err), "cannot find 'undefined_thing' in symbol table");
}

#[test]
fn len_counts_characters() {
    let (mut rt, ctx) = runtime();
    let text = rt.new_str("héllo").unwrap();
    let n = call_builtin(&mut rt, ctx, "len", &[text]).unwrap();
    assert_eq!(rt.as_int(n), Some(5));
    let one = rt.new_int(1).unwrap();
    let err = call_builtin(&mut rt, ctx, "len", &[one]).unwrap_err();
    assert_eq!(message(err), "len unimplemented for 'int'");
}

#[test]
fn int_parsing() {
    let (mut rt, ctx) = runtime();
    let ff = rt.new_str("ff").unwrap();
    let sixteen = rt.new_int(16).unwrap();
    let n = call_builtin(&mut rt, ctx, "int", &[ff, sixteen]).unwrap();
    assert_eq!(rt.as_int(n), Some(255));

    let text = rt.new_str(" -1_000 ").unwrap();
    let n = call_builtin(&mut rt, ctx, "int", &[text]).unwrap();
    assert_eq!(rt.as_int(n), Some(-1000));

    let bad = rt.new_str("x").unwrap();
    let err = call_builtin(&mut rt, ctx, "int", &[bad]).unwrap_err();
    assert_eq!(message(err), "invalid literal for int() with base 10: 'x'");
}

#[test]
fn max_min_any_all() {
    let (mut rt, ctx) = runtime();
    let list = int_list(&mut rt, &[3, 9, 2]);
    let max = call_builtin(&mut rt, ctx, "max", &[list]).unwrap();
    assert_eq!(rt.as_int(max), Some(9));
    let nums = common::ints(&mut rt, &[4, -1]);
    let min = call_builtin(&mut rt, ctx, "min", &nums).unwrap();
    assert_eq!(rt.as_int(min), Some(-1));

    let empty = rt.new_list(Vec::new()).unwrap();
    let err = call_builtin(&mut rt, ctx, "max", &[empty]).unwrap_err();
    assert_eq!(message(err), "max() argument is empty");
    let all = call_builtin(&mut rt, ctx, "all", &[empty]).unwrap();
    assert!(rt.truthy(all));
    let zeros = int_list(&mut rt, &[0, 0]);
    let any = call_builtin(&mut rt, ctx, "any", &[zeros]).unwrap();
    assert!(!rt.truthy(any));
}

#[test]
fn ord_chr_abs_hash() {
    let (mut rt, ctx) = runtime();
    let a = rt.new_str("a").unwrap();
    let code = call_builtin(&mut rt, ctx, "ord", &[a]).unwrap();
    assert_eq!(rt.as_int(code), Some(97));
    let back = call_builtin(&mut rt, ctx, "chr", &[code]).unwrap();
    assert_eq!(rt.as_str(back), Some("a"));

    let neg = rt.new_int(-5).unwrap();
    let abs = call_builtin(&mut rt, ctx, "abs", &[neg]).unwrap();
    assert_eq!(rt.as_int(abs), Some(5));

    let h = call_builtin(&mut rt, ctx, "hash", &[neg]).unwrap();
    assert_eq!(rt.as_int(h), Some(-5));
}

#[test]
fn constructors() {
    let (mut rt, ctx) = runtime();
    let text = rt.new_str("hi").unwrap();
    let chars = call_builtin(&mut rt, ctx, "list", &[text]).unwrap();
    assert_eq!(rt.repr(chars), "['h', 'i']");
    let tuple = call_builtin(&mut rt, ctx, "tuple", &[chars]).unwrap();
    assert_eq!(rt.repr(tuple), "('h', 'i')");

    let five = rt.new_int(5).unwrap();
    let range = call_builtin(&mut rt, ctx, "range", &[five]).unwrap();
    assert_eq!(rt.repr(range), "range(0, 5)");
    let zero = rt.new_int(0).unwrap();
    let err = call_builtin(&mut rt, ctx, "range", &[zero, five, zero]).unwrap_err();
    assert_eq!(message(err), "range() arg 3 must not be zero");

    let nothing = call_builtin(&mut rt, ctx, "bool", &[]).unwrap();
    assert!(nothing.is(rt.create_bool_const(false)));
    let s = call_builtin(&mut rt, ctx, "str", &[tuple]).unwrap();
    assert_eq!(rt.as_str(s), Some("('h', 'i')"));

    let bytes = int_list(&mut rt, &[104, 105]);
    let b = call_builtin(&mut rt, ctx, "bytes", &[bytes]).unwrap();
    assert_eq!(rt.repr(b), "b'hi'");
    let decoded = common::call_method(&mut rt, ctx, b, "decode", &[]).unwrap();
    assert_eq!(rt.as_str(decoded), Some("hi"));
}

#[test]
fn iteration_helpers() {
    let (mut rt, ctx) = runtime();
    let letters = rt.new_str("ab").unwrap();
    let numbers = int_list(&mut rt, &[1, 2, 3]);
    let zipped = call_builtin(&mut rt, ctx, "zip", &[letters, numbers]).unwrap();
    let pairs = call_builtin(&mut rt, ctx, "list", &[zipped]).unwrap();
    assert_eq!(rt.repr(pairs), "[('a', 1), ('b', 2)]");

    let enumerated = call_builtin(&mut rt, ctx, "enumerate", &[letters]).unwrap();
    assert_eq!(rt.type_name(enumerated), "enumerate");
    let pairs = call_builtin(&mut rt, ctx, "list", &[enumerated]).unwrap();
    assert_eq!(rt.repr(pairs), "[(0, 'a'), (1, 'b')]");

    let backwards = call_builtin(&mut rt, ctx, "reversed", &[numbers]).unwrap();
    let listed = call_builtin(&mut rt, ctx, "list", &[backwards]).unwrap();
    assert_eq!(rt.repr(listed), "[3, 2, 1]");

    let it = call_builtin(&mut rt, ctx, "iter", &[numbers]).unwrap();
    assert_eq!(rt.repr(it), "<list_iterator object>");
    for expected in 1..=3 {
        let v = call_builtin(&mut rt, ctx, "next", &[it]).unwrap();
        assert_eq!(rt.as_int(v), Some(expected));
    }
    let err = call_builtin(&mut rt, ctx, "next", &[it]).unwrap_err();
    assert_eq!(message(err), "iterator is exhausted");
    let none = rt.none();
    let fallback = call_builtin(&mut rt, ctx, "next", &[it, none]).unwrap();
    assert!(rt.is_none(fallback));

    let one = rt.new_int(1).unwrap();
    let err = call_builtin(&mut rt, ctx, "iter", &[one]).unwrap_err();
    assert_eq!(message(err), "'int' object is not iterable");
}

#[test]
fn reversed_range_and_string() {
    let (mut rt, ctx) = runtime();
    let range = rt.new_range(0, 10, 3).unwrap();
    let back = call_builtin(&mut rt, ctx, "reversed", &[range]).unwrap();
    let listed = call_builtin(&mut rt, ctx, "list", &[back]).unwrap();
    assert_eq!(rt.repr(listed), "[9, 6, 3, 0]");

    let text = rt.new_str("añb").unwrap();
    let back = call_builtin(&mut rt, ctx, "reversed", &[text]).unwrap();
    let listed = call_builtin(&mut rt, ctx, "list", &[back]).unwrap();
    assert_eq!(rt.repr(listed), "['b', 'ñ', 'a']");
}
