mod common;

use common::{int_list, runtime, runtime_with};
use pyc_runtime::RuntimeConfig;

#[test]
fn shared_children_are_marked_once() {
    let (mut rt, ctx) = runtime();
    rt.collect_now(ctx, None);
    let baseline = rt.gc_stats().last_marked;

    let leaf = rt.new_int(7).unwrap();
    let inner = rt.new_list(vec![leaf]).unwrap();
    let outer = rt.new_list(vec![inner, inner]).unwrap();
    rt.store(ctx, 0, outer);
    rt.collect_now(ctx, None);

    assert_eq!(rt.gc_stats().last_marked - baseline, 3);
}

#[test]
fn collection_waits_for_threshold() {
    let mut config = RuntimeConfig::captured();
    config.gc_threshold = 10;
    let (mut rt, ctx) = runtime_with(config);
    rt.collect_now(ctx, None);

    for i in 0..9 {
        rt.new_int(i).unwrap();
        assert!(!rt.collect_garbage(ctx, None));
    }
    rt.new_int(9).unwrap();
    assert_eq!(rt.gc_stats().pending_allocs, 10);
    assert!(rt.collect_garbage(ctx, None));
    assert_eq!(rt.gc_stats().pending_allocs, 0);
}

#[test]
fn retained_values_survive_under_load() {
    let (mut rt, ctx) = runtime();
    let kept = rt.new_list(Vec::new()).unwrap();
    rt.store(ctx, 0, kept);
    let append = rt.getattr(kept, "append").unwrap();
    rt.store(ctx, 1, append);

    for i in 0..2000 {
        let n = rt.new_int(i).unwrap();
        if i % 10 == 0 {
            rt.call_values(ctx, append, &[n]).unwrap();
        }
        rt.collect_garbage(ctx, None);
    }

    let stats = rt.gc_stats();
    assert!(stats.collections >= 10, "{stats:?}");
    let items = rt.as_seq(kept).unwrap().to_vec();
    assert_eq!(items.len(), 200);
    for (i, item) in items.into_iter().enumerate() {
        assert!(rt.is_valid(item));
        assert_eq!(rt.as_int(item), Some(i as i64 * 10));
    }

    let arena = rt.arena_stats();
    assert_eq!(arena.chunks, 1);
    assert_eq!(arena.class_for(16).unwrap().blocks, 1);
}

#[test]
fn pending_value_is_a_root() {
    let (mut rt, ctx) = runtime();
    rt.collect_now(ctx, None);
    let baseline = rt.gc_stats().last_marked;

    let result = int_list(&mut rt, &[1, 2]);
    rt.collect_now(ctx, Some(result));
    assert_eq!(rt.gc_stats().last_marked - baseline, 3);
    assert_eq!(rt.as_seq(result).map(<[_]>::len), Some(2));
}

#[test]
fn caller_chain_is_scanned() {
    let (mut rt, globals) = runtime();
    rt.collect_now(globals, None);
    let baseline = rt.gc_stats().last_marked;

    let caller = rt.new_context(Some(globals), 1).unwrap();
    let callee = rt.new_context(Some(caller), 1).unwrap();
    let held = int_list(&mut rt, &[5]);
    rt.store(caller, 0, held);
    rt.collect_now(callee, None);

    // callee, caller, the list and its element
    assert_eq!(rt.gc_stats().last_marked - baseline, 4);
    assert_eq!(rt.gc_stats().collections, 2);
}

#[test]
fn instances_keep_class_and_attributes_alive() {
    let (mut rt, ctx) = runtime();
    rt.collect_now(ctx, None);
    let baseline = rt.gc_stats().last_marked;

    let class = rt.new_class("Box", &[]).unwrap();
    let args = rt.new_tuple(Vec::new()).unwrap();
    let inst = rt.call(ctx, class, args, None).unwrap();
    let payload = rt.new_str("x").unwrap();
    rt.setattr(inst, "payload", payload).unwrap();
    rt.store(ctx, 2, inst);
    rt.collect_now(ctx, None);

    assert_eq!(rt.gc_stats().last_marked - baseline, 3);
}
