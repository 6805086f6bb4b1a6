mod common;

use common::{message, runtime};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use pyc_core::fnv1a;

fn any_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..24).prop_map(|v| v.into_iter().collect::<String>())
}

fn ascii_word() -> impl Strategy<Value = String> {
    proptest::collection::vec(b'a'..=b'z', 1..16).prop_map(|v| v.into_iter().map(char::from).collect::<String>())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]
    #[test]
    fn equal_strings_find_the_same_entry(s in any_text()) {
        let (mut rt, _ctx) = runtime();
        let stored = rt.new_str(s.as_str()).unwrap();
        let probe = rt.new_str(s.as_str()).unwrap();
        prop_assert!(!stored.is(probe));
        prop_assert_eq!(rt.hash_of(stored).unwrap(), rt.hash_of(probe).unwrap());

        let value = rt.new_int(42).unwrap();
        let dict = rt.new_dict_from(&[(stored, value)]).unwrap();
        let found = rt.dict_get(dict, probe).unwrap();
        prop_assert!(found.is(value));
    }

    #[test]
    fn interned_and_fresh_strings_hash_alike(s in ascii_word()) {
        let (mut rt, _ctx) = runtime();
        let interned = rt.intern_str(&s).unwrap();
        let fresh = rt.new_str(s.as_str()).unwrap();
        prop_assert_eq!(rt.hash_of(interned).unwrap(), fnv1a(s.as_bytes()));
        prop_assert_eq!(rt.hash_of(fresh).unwrap(), fnv1a(s.as_bytes()));
    }
}

#[test]
fn colliding_unequal_keys_stay_distinct() {
    let (mut rt, _ctx) = runtime();
    let text = rt.new_str("abc").unwrap();
    let number = rt.new_int(fnv1a(b"abc") as i64).unwrap();
    assert_eq!(rt.hash_of(text).unwrap(), rt.hash_of(number).unwrap());

    let one = rt.new_int(1).unwrap();
    let two = rt.new_int(2).unwrap();
    let dict = rt.new_dict_from(&[(text, one), (number, two)]).unwrap();
    assert!(rt.dict_get(dict, text).unwrap().is(one));
    assert!(rt.dict_get(dict, number).unwrap().is(two));

    let other = rt.new_str("abd").unwrap();
    assert_eq!(rt.dict_lookup(dict, other).unwrap(), None);
}

#[test]
fn bool_and_int_keys_are_the_same_key() {
    let (mut rt, _ctx) = runtime();
    let one = rt.new_int(1).unwrap();
    let t = rt.create_bool_const(true);
    let a = rt.new_str("a").unwrap();
    let b = rt.new_str("b").unwrap();
    let dict = rt.new_dict_from(&[(one, a), (t, b)]).unwrap();
    assert_eq!(rt.repr(dict), "{1: 'b'}");
}

#[test]
fn missing_key_names_the_key() {
    let (mut rt, _ctx) = runtime();
    let a = rt.new_str("a").unwrap();
    let one = rt.new_int(1).unwrap();
    let dict = rt.new_dict_from(&[(a, one)]).unwrap();
    let b = rt.new_str("b").unwrap();
    let err = rt.getitem(dict, b).unwrap_err();
    assert_eq!(message(err), "cannot find 'b' in dict");
}

#[test]
fn lists_are_unhashable() {
    let (mut rt, _ctx) = runtime();
    let key = rt.new_list(Vec::new()).unwrap();
    let dict = rt.new_dict().unwrap();
    let none = rt.none();
    let err = rt.setitem(dict, key, none).unwrap_err();
    assert_eq!(message(err), "unhashable type: 'list'");
}

#[test]
fn tuples_hash_by_content() {
    let (mut rt, _ctx) = runtime();
    let x = rt.new_int(1).unwrap();
    let y = rt.new_str("y").unwrap();
    let first = rt.new_tuple(vec![x, y]).unwrap();
    let y2 = rt.new_str("y").unwrap();
    let second = rt.new_tuple(vec![x, y2]).unwrap();
    assert_eq!(rt.hash_of(first).unwrap(), rt.hash_of(second).unwrap());

    let set = rt.new_set_from(&[first, second]).unwrap();
    assert_eq!(rt.repr(set), "{(1, 'y')}");
}

#[test]
fn dict_iterates_in_key_hash_order() {
    let (mut rt, ctx) = runtime();
    let keys = common::ints(&mut rt, &[30, 10, 20]);
    let none = rt.none();
    let dict = rt.new_dict().unwrap();
    for k in keys {
        rt.setitem(dict, k, none).unwrap();
    }
    let listed = common::call_builtin(&mut rt, ctx, "list", &[dict]).unwrap();
    assert_eq!(rt.repr(listed), "[10, 20, 30]");

    let ten = rt.new_int(10).unwrap();
    rt.delitem(dict, ten).unwrap();
    assert_eq!(rt.repr(dict), "{20: None, 30: None}");
}
