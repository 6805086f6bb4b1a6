mod common;

use common::{call_builtin, call_method, int_list, message, runtime};
use proptest::prelude::*;

#[test]
fn append_pop_and_negative_index() {
    let (mut rt, ctx) = runtime();
    let list = int_list(&mut rt, &[1, 2, 3]);
    let four = rt.new_int(4).unwrap();
    call_method(&mut rt, ctx, list, "append", &[four]).unwrap();
    let minus_one = rt.new_int(-1).unwrap();
    let last = rt.getitem(list, minus_one).unwrap();
    assert_eq!(rt.as_int(last), Some(4));

    let popped = call_method(&mut rt, ctx, list, "pop", &[]).unwrap();
    assert!(popped.is(four));
    let first = rt.new_int(0).unwrap();
    let popped = call_method(&mut rt, ctx, list, "pop", &[first]).unwrap();
    assert_eq!(rt.as_int(popped), Some(1));
    assert_eq!(rt.repr(list), "[2, 3]");
}

#[test]
fn index_errors_are_fatal() {
    let (mut rt, ctx) = runtime();
    let list = int_list(&mut rt, &[1]);
    let five = rt.new_int(5).unwrap();
    let err = rt.getitem(list, five).unwrap_err();
    assert_eq!(message(err), "list index out of range");

    let err = call_method(&mut rt, ctx, list, "index", &[five]).unwrap_err();
    assert_eq!(message(err), "5 is not in list");

    let empty = rt.new_list(Vec::new()).unwrap();
    let err = call_method(&mut rt, ctx, empty, "pop", &[]).unwrap_err();
    assert_eq!(message(err), "list is empty");
}

#[test]
fn method_arity_is_checked() {
    let (mut rt, ctx) = runtime();
    let list = int_list(&mut rt, &[1]);
    let err = call_method(&mut rt, ctx, list, "append", &[]).unwrap_err();
    assert_eq!(
        message(err),
        "wrong number of arguments to list.append(): expected 1, got 0"
    );
}

#[test]
fn slicing() {
    let (mut rt, _ctx) = runtime();
    let list = int_list(&mut rt, &[0, 1, 2, 3, 4, 5]);
    let one = rt.new_int(1).unwrap();
    let two = rt.new_int(2).unwrap();
    let minus_one = rt.new_int(-1).unwrap();
    let every_other = rt.slice(list, Some(one), None, Some(two)).unwrap();
    assert_eq!(rt.repr(every_other), "[1, 3, 5]");
    let reversed = rt.slice(list, None, None, Some(minus_one)).unwrap();
    assert_eq!(rt.repr(reversed), "[5, 4, 3, 2, 1, 0]");

    let text = rt.new_str("héllo").unwrap();
    let head = rt.slice(text, None, Some(two), None).unwrap();
    assert_eq!(rt.as_str(head), Some("hé"));

    let range = rt.new_range(0, 10, 1).unwrap();
    let stepped = rt.slice(range, Some(one), None, Some(two)).unwrap();
    assert_eq!(rt.repr(stepped), "range(1, 10, 2)");
    let backwards = rt.slice(range, None, None, Some(minus_one)).unwrap();
    assert_eq!(rt.repr(backwards), "range(9, -1, -1)");
}

#[test]
fn slice_steps_past_the_end() {
    let (mut rt, _ctx) = runtime();
    let list = int_list(&mut rt, &[0, 1, 2, 3]);
    let one = rt.new_int(1).unwrap();
    let huge = rt.new_int(i64::MAX).unwrap();
    let min = rt.new_int(i64::MIN).unwrap();
    let picked = rt.slice(list, Some(one), None, Some(huge)).unwrap();
    assert_eq!(rt.repr(picked), "[1]");
    let picked = rt.slice(list, None, None, Some(min)).unwrap();
    assert_eq!(rt.repr(picked), "[3]");
    let far = rt.slice(list, Some(huge), Some(min), None).unwrap();
    assert_eq!(rt.repr(far), "[]");
}

#[test]
fn huge_ranges_slice_without_materializing() {
    let (mut rt, ctx) = runtime();
    let range = rt.new_range(0, 1 << 62, 1).unwrap();
    let two = rt.new_int(2).unwrap();
    let evens = rt.slice(range, None, None, Some(two)).unwrap();
    assert_eq!(rt.repr(evens), "range(0, 4611686018427387904, 2)");

    let wide = rt.new_range(i64::MIN, i64::MAX, 1).unwrap();
    let err = call_builtin(&mut rt, ctx, "len", &[wide]).unwrap_err();
    assert_eq!(message(err), "integer overflow in len");
    let three = rt.new_int(3).unwrap();
    let thirds = rt.slice(wide, None, None, Some(three)).unwrap();
    let n = call_builtin(&mut rt, ctx, "len", &[thirds]).unwrap();
    assert_eq!(rt.as_int(n), Some(6148914691236517205));
    let last = rt.new_int(-1).unwrap();
    let tail = rt.getitem(thirds, last).unwrap();
    assert_eq!(rt.as_int(tail), Some(i64::MAX - 3));
}

#[test]
fn oversized_repeats_are_refused() {
    let (mut rt, ctx) = runtime();
    let list = int_list(&mut rt, &[1, 2]);
    let many = rt.new_int(1 << 40).unwrap();
    let err = rt.binary(pyc_runtime::BinOp::Mul, list, many).unwrap_err();
    assert_eq!(message(err), "repeated sequence is too large");
    let err = call_builtin(&mut rt, ctx, "bytes", &[many]).unwrap_err();
    assert_eq!(message(err), "bytes count is too large");

    let empty = int_list(&mut rt, &[]);
    let none = rt.binary(pyc_runtime::BinOp::Mul, empty, many).unwrap();
    assert_eq!(rt.repr(none), "[]");
}

#[test]
fn sort_and_sorted_are_stable() {
    let (mut rt, ctx) = runtime();
    let list = int_list(&mut rt, &[3, 1, 2, 1]);
    let sorted = call_builtin(&mut rt, ctx, "sorted", &[list]).unwrap();
    assert_eq!(rt.repr(sorted), "[1, 1, 2, 3]");
    assert_eq!(rt.repr(list), "[3, 1, 2, 1]");

    call_method(&mut rt, ctx, list, "sort", &[]).unwrap();
    assert_eq!(rt.repr(list), "[1, 1, 2, 3]");

    let mixed = rt.new_str("a").unwrap();
    call_method(&mut rt, ctx, list, "append", &[mixed]).unwrap();
    let err = call_method(&mut rt, ctx, list, "sort", &[]).unwrap_err();
    assert!(message(err).starts_with("lt unimplemented"));
}

#[test]
fn string_methods() {
    let (mut rt, ctx) = runtime();
    let text = rt.new_str("  a b  c ").unwrap();
    let words = call_method(&mut rt, ctx, text, "split", &[]).unwrap();
    assert_eq!(rt.repr(words), "['a', 'b', 'c']");

    let sep = rt.new_str("-").unwrap();
    let joined = call_method(&mut rt, ctx, sep, "join", &[words]).unwrap();
    assert_eq!(rt.as_str(joined), Some("a-b-c"));

    let stripped = call_method(&mut rt, ctx, text, "strip", &[]).unwrap();
    let upper = call_method(&mut rt, ctx, stripped, "upper", &[]).unwrap();
    assert_eq!(rt.as_str(upper), Some("A B  C"));

    let prefix = rt.new_str("a b").unwrap();
    let starts = call_method(&mut rt, ctx, stripped, "startswith", &[prefix]).unwrap();
    assert!(rt.truthy(starts));
}

#[test]
fn dict_methods() {
    let (mut rt, ctx) = runtime();
    let a = rt.new_str("a").unwrap();
    let one = rt.new_int(1).unwrap();
    let dict = rt.new_dict_from(&[(a, one)]).unwrap();
    let b = rt.new_str("b").unwrap();
    let zero = rt.new_int(0).unwrap();
    let got = call_method(&mut rt, ctx, dict, "get", &[b, zero]).unwrap();
    assert!(got.is(zero));

    let two = rt.new_int(2).unwrap();
    let pair = rt.new_tuple(vec![b, two]).unwrap();
    let pairs = rt.new_list(vec![pair]).unwrap();
    call_method(&mut rt, ctx, dict, "update", &[pairs]).unwrap();
    let items = call_method(&mut rt, ctx, dict, "items", &[]).unwrap();
    let listed = call_builtin(&mut rt, ctx, "sorted", &[items]).unwrap();
    assert_eq!(rt.repr(listed), "[('a', 1), ('b', 2)]");

    let popped = call_method(&mut rt, ctx, dict, "pop", &[a]).unwrap();
    assert!(popped.is(one));
    let err = call_method(&mut rt, ctx, dict, "pop", &[a]).unwrap_err();
    assert_eq!(message(err), "cannot find 'a' in dict");
}

#[test]
fn set_methods() {
    let (mut rt, ctx) = runtime();
    let set = rt.new_set().unwrap();
    let values = common::ints(&mut rt, &[3, 1, 3]);
    for v in &values {
        call_method(&mut rt, ctx, set, "add", &[*v]).unwrap();
    }
    assert_eq!(rt.repr(set), "{1, 3}");

    let drop = int_list(&mut rt, &[3, 9]);
    call_method(&mut rt, ctx, set, "difference_update", &[drop]).unwrap();
    assert_eq!(rt.repr(set), "{1}");

    let nine = rt.new_int(9).unwrap();
    call_method(&mut rt, ctx, set, "discard", &[nine]).unwrap();
    let err = call_method(&mut rt, ctx, set, "remove", &[nine]).unwrap_err();
    assert_eq!(message(err), "9 is not in set");
}

#[test]
fn unknown_method_is_an_attribute_error() {
    let (mut rt, _ctx) = runtime();
    let list = int_list(&mut rt, &[]);
    let err = rt.getattr(list, "push").unwrap_err();
    assert_eq!(message(err), "'list' object has no attribute 'push'");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn list_mutation_boundaries(
        values in prop::collection::vec(-1000i64..1000, 0..24),
        extra in -1000i64..1000,
        idx in -40i64..40,
    ) {
        let (mut rt, ctx) = runtime();
        let list = int_list(&mut rt, &values);
        let len = values.len() as i64;

        let item = rt.new_int(extra).unwrap();
        call_method(&mut rt, ctx, list, "append", &[item]).unwrap();
        let mut expected = values.clone();
        expected.push(extra);
        let n = call_builtin(&mut rt, ctx, "len", &[list]).unwrap();
        prop_assert_eq!(rt.as_int(n), Some(len + 1));
        for (i, want) in expected.iter().enumerate() {
            let key = rt.new_int(i as i64).unwrap();
            let got = rt.getitem(list, key).unwrap();
            prop_assert_eq!(rt.as_int(got), Some(*want));
        }

        let key = rt.new_int(idx).unwrap();
        let in_range = -(len + 1) <= idx && idx < len + 1;
        match rt.getitem(list, key) {
            Ok(got) => {
                prop_assert!(in_range);
                let pos = if idx < 0 { idx + len + 1 } else { idx };
                prop_assert_eq!(rt.as_int(got), Some(expected[pos as usize]));
            }
            Err(err) => {
                prop_assert!(!in_range);
                prop_assert_eq!(message(err), "list index out of range");
            }
        }

        let popped = call_method(&mut rt, ctx, list, "pop", &[]).unwrap();
        prop_assert!(popped.is(item));
        let n = call_builtin(&mut rt, ctx, "len", &[list]).unwrap();
        prop_assert_eq!(rt.as_int(n), Some(len));
    }
}
