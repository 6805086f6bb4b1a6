use pyc_core::arena::{AllocError, Arena, ArenaConfig, LARGE_OBJECT_LIMIT, SIZE_CLASSES};

fn small_config() -> ArenaConfig {
    ArenaConfig {
        block_size: 1024,
        chunk_size: 8192,
    }
}

#[test]
fn size_classes_pick_smallest_fit() {
    assert_eq!(Arena::<u32>::size_class(1), Some(0));
    assert_eq!(Arena::<u32>::size_class(16), Some(0));
    assert_eq!(Arena::<u32>::size_class(17), Some(1));
    assert_eq!(Arena::<u32>::size_class(72), Some(6));
    assert_eq!(Arena::<u32>::size_class(73), Some(7));
    assert_eq!(Arena::<u32>::size_class(LARGE_OBJECT_LIMIT), Some(7));
    assert_eq!(Arena::<u32>::size_class(LARGE_OBJECT_LIMIT + 1), None);
}

#[test]
fn slots_per_block_leaves_room_for_bitmap() {
    let cfg = ArenaConfig::default();
    assert_eq!(cfg.slots_per_block(16), 1015);
    assert_eq!(cfg.slots_per_block(72), 227);
    for &size in &SIZE_CLASSES {
        let n = cfg.slots_per_block(size);
        assert!(n * size + n.div_ceil(8) <= cfg.block_size - 8);
    }
}

#[test]
fn construction_takes_one_block_per_class_from_first_chunk() {
    let arena: Arena<u32> = Arena::new();
    let stats = arena.stats();
    assert_eq!(stats.chunks, 1);
    for class in &stats.classes[..SIZE_CLASSES.len()] {
        assert_eq!(class.blocks, 1);
        assert_eq!(class.live, 0);
    }
    assert_eq!(stats.large().map(|c| c.blocks), Some(0));
}

#[test]
fn dead_slots_are_reused_without_growth() {
    let mut arena: Arena<usize> = Arena::new();
    let per_block = arena.config().slots_per_block(24);
    for i in 0..per_block {
        arena.allocate(24, i).unwrap();
    }
    let before = arena.stats();
    assert_eq!(before.class_for(24).unwrap().live, per_block);

    for _ in 0..5 {
        arena.mark_dead();
        assert_eq!(arena.stats().total_live(), 0);
        for i in 0..per_block {
            arena.allocate(24, i).unwrap();
        }
    }
    let after = arena.stats();
    assert_eq!(after.chunks, before.chunks);
    assert_eq!(after.class_for(24).unwrap().blocks, 1);
}

#[test]
fn full_block_grows_pool() {
    let mut arena: Arena<usize> = Arena::new();
    let per_block = arena.config().slots_per_block(16);
    for i in 0..per_block {
        arena.allocate(16, i).unwrap();
    }
    assert_eq!(arena.stats().class_for(16).unwrap().blocks, 1);
    arena.allocate(16, 0).unwrap();
    assert_eq!(arena.stats().class_for(16).unwrap().blocks, 2);
}

#[test]
fn reused_slot_bumps_generation() {
    let mut arena: Arena<&'static str> = Arena::new();
    let old = arena.allocate(32, "old").unwrap();
    arena.mark_dead();
    let new = arena.allocate(32, "new").unwrap();
    assert_eq!((old.block(), old.slot()), (new.block(), new.slot()));
    assert_eq!(new.generation(), old.generation() + 1);
    assert_eq!(arena.try_get(old), None);
    assert_eq!(*arena.get(new), "new");
}

#[test]
#[should_panic(expected = "stale object handle")]
fn stale_get_panics() {
    let mut arena: Arena<u8> = Arena::new();
    let old = arena.allocate(16, 1).unwrap();
    arena.mark_dead();
    arena.allocate(16, 2).unwrap();
    let _ = arena.get(old);
}

#[test]
fn marked_objects_survive_collection() {
    let mut arena: Arena<u32> = Arena::new();
    let keep = arena.allocate(40, 7).unwrap();
    let drop = arena.allocate(40, 8).unwrap();
    arena.mark_dead();
    assert!(!arena.mark_live(keep));
    let fresh = arena.allocate(40, 9).unwrap();
    assert_ne!((fresh.block(), fresh.slot()), (keep.block(), keep.slot()));
    assert_eq!((fresh.block(), fresh.slot()), (drop.block(), drop.slot()));
    assert_eq!(*arena.get(keep), 7);
    assert!(arena.is_live(keep));
}

#[test]
fn mark_live_reports_already_marked() {
    let mut arena: Arena<u32> = Arena::new();
    let id = arena.allocate(56, 1).unwrap();
    arena.mark_dead();
    assert!(!arena.is_live(id));
    assert!(!arena.mark_live(id));
    assert!(arena.mark_live(id));
    assert!(arena.is_live(id));
}

#[test]
fn trailing_bits_never_handed_out() {
    let mut arena: Arena<usize> = Arena::with_config(small_config()).unwrap();
    let per_block = small_config().slots_per_block(72);
    assert_eq!(per_block, 14);
    arena.mark_dead();
    let ids: Vec<_> = (0..per_block)
        .map(|i| arena.allocate(72, i).unwrap())
        .collect();
    assert!(ids.iter().all(|id| id.block() == 0));
    assert!(ids.iter().all(|id| (id.slot() as usize) < per_block));
    let next = arena.allocate(72, 99).unwrap();
    assert_eq!((next.block(), next.slot()), (1, 0));
}

#[test]
fn spent_chunk_acquires_another() {
    let cfg = small_config();
    let mut arena: Arena<usize> = Arena::with_config(cfg).unwrap();
    assert_eq!(cfg.blocks_per_chunk(), 8);
    let per_block = cfg.slots_per_block(72);
    // seven blocks were taken at construction; one more fits in the first chunk
    for i in 0..per_block * 2 {
        arena.allocate(72, i).unwrap();
    }
    assert_eq!(arena.stats().chunks, 1);
    arena.allocate(72, 0).unwrap();
    let stats = arena.stats();
    assert_eq!(stats.chunks, 2);
    assert_eq!(stats.class_for(72).unwrap().blocks, 3);
}

#[test]
fn large_objects_do_not_draw_from_chunks() {
    let mut arena: Arena<Vec<u8>> = Arena::new();
    let first = arena.allocate(4096, vec![1; 4]).unwrap();
    assert!(first.is_large());
    for _ in 0..64 {
        arena.allocate(100, Vec::new()).unwrap();
    }
    let stats = arena.stats();
    assert_eq!(stats.chunks, 1);
    assert_eq!(stats.large().unwrap().blocks, 2);
    assert_eq!(arena.get(first).len(), 4);
}

#[test]
fn oversize_request_is_rejected() {
    let mut arena: Arena<u8> = Arena::new();
    let err = arena.allocate(LARGE_OBJECT_LIMIT + 1, 0).unwrap_err();
    assert_eq!(err, AllocError::BadSize(LARGE_OBJECT_LIMIT + 1));
    assert_eq!(err.to_string(), format!("bad obj size {}", LARGE_OBJECT_LIMIT + 1));
}

#[test]
fn invalid_layouts_are_rejected() {
    let odd = ArenaConfig {
        block_size: 1000,
        chunk_size: 8000,
    };
    assert!(matches!(
        Arena::<u8>::with_config(odd),
        Err(AllocError::BadLayout(_))
    ));
    let tiny_chunk = ArenaConfig {
        block_size: 1024,
        chunk_size: 512,
    };
    assert!(Arena::<u8>::with_config(tiny_chunk).is_err());
}
