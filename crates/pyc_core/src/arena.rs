//! Size-classed slab arena with per-block liveness bitmaps.
//!
//! Memory is handed out in chunks, chunks are cut into blocks, and every block
//! serves a single size class. Each block keeps one liveness bit per slot:
//! allocation claims the first clear bit, the collector clears every bit with
//! [`Arena::mark_dead`] and sets the reachable ones again with
//! [`Arena::mark_live`]. A slot whose bit stays clear is simply reused by a
//! later allocation; there is no explicit free and no finalizer pass.

use crate::gc::{LARGE_CLASS, ObjectId};
use std::fmt;

/// Object sizes served by slab blocks, in bytes.
pub const SIZE_CLASSES: [usize; 7] = [16, 24, 32, 40, 56, 64, 72];

pub const DEFAULT_BLOCK_SIZE: usize = 1 << 14;
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 21;

/// Footprints above this are rejected outright.
pub const LARGE_OBJECT_LIMIT: usize = 1 << 20;

const LARGE_SLOTS_PER_BLOCK: usize = 64;
// Room reserved in every block for the next-block link.
const BLOCK_HEADER: usize = std::mem::size_of::<usize>();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    pub block_size: usize,
    pub chunk_size: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ArenaConfig {
    /// Number of blocks one chunk can be cut into.
    pub fn blocks_per_chunk(&self) -> usize {
        (self.chunk_size / self.block_size).max(1)
    }

    /// Slots of `obj_size` bytes that fit in one block next to their liveness bits.
    pub fn slots_per_block(&self, obj_size: usize) -> usize {
        let capacity = self.block_size.saturating_sub(BLOCK_HEADER);
        capacity * 8 / (obj_size * 8 + 1)
    }

    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.block_size.is_power_of_two() {
            return Err(AllocError::BadLayout("block size must be a power of two"));
        }
        if self.chunk_size < self.block_size {
            return Err(AllocError::BadLayout("chunk smaller than one block"));
        }
        let smallest = self.slots_per_block(SIZE_CLASSES[0]);
        let largest = self.slots_per_block(SIZE_CLASSES[SIZE_CLASSES.len() - 1]);
        if largest == 0 {
            return Err(AllocError::BadLayout("block too small for the largest size class"));
        }
        if smallest > u16::MAX as usize {
            return Err(AllocError::BadLayout("block too large for 16-bit slot indices"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// No size class fits and the request is above the large-object limit.
    BadSize(usize),
    BadLayout(&'static str),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::BadSize(size) => write!(f, "bad obj size {size}"),
            AllocError::BadLayout(msg) => write!(f, "bad arena layout: {msg}"),
        }
    }
}

impl std::error::Error for AllocError {}

struct Block<T> {
    live: Box<[u64]>,
    generations: Box<[u32]>,
    slots: Box<[Option<T>]>,
    n_objects: usize,
}

impl<T> Block<T> {
    fn new(n_objects: usize) -> Self {
        let words = n_objects.div_ceil(64).max(1);
        let mut block = Self {
            live: vec![0u64; words].into_boxed_slice(),
            generations: vec![0u32; n_objects].into_boxed_slice(),
            slots: (0..n_objects).map(|_| None).collect(),
            n_objects,
        };
        block.mark_dead();
        block
    }

    /// Bits past the last real slot stay set so they are never handed out.
    fn mark_dead(&mut self) {
        let last = self.live.len() - 1;
        for word in &mut self.live[..last] {
            *word = 0;
        }
        let tail = self.n_objects & 63;
        self.live[last] = if tail == 0 { 0 } else { !0u64 << tail };
    }

    fn take_free(&mut self) -> Option<usize> {
        for (t, word) in self.live.iter_mut().enumerate() {
            let dead = !*word;
            if dead != 0 {
                let bit = dead.trailing_zeros() as usize;
                *word |= 1u64 << bit;
                return Some(t * 64 + bit);
            }
        }
        None
    }

    fn mark_live(&mut self, idx: usize) -> bool {
        let word = &mut self.live[idx / 64];
        let bit = 1u64 << (idx & 63);
        let already_live = (*word & bit) != 0;
        *word |= bit;
        already_live
    }

    fn is_live(&self, idx: usize) -> bool {
        (self.live[idx / 64] & (1u64 << (idx & 63))) != 0
    }

    fn live_count(&self) -> usize {
        let set: usize = self.live.iter().map(|w| w.count_ones() as usize).sum();
        set - (self.live.len() * 64 - self.n_objects)
    }
}

struct Pool<T> {
    obj_size: usize,
    slots_per_block: usize,
    blocks: Vec<Block<T>>,
    cursor: usize,
}

impl<T> Pool<T> {
    fn scan(&mut self) -> Option<(usize, usize)> {
        while self.cursor < self.blocks.len() {
            if let Some(slot) = self.blocks[self.cursor].take_free() {
                return Some((self.cursor, slot));
            }
            self.cursor += 1;
        }
        None
    }
}

/// Per-class occupancy, as reported by [`Arena::stats`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub obj_size: usize,
    pub blocks: usize,
    pub capacity: usize,
    pub live: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub chunks: usize,
    /// Slab classes in [`SIZE_CLASSES`] order, then the large-object pool.
    pub classes: Vec<ClassStats>,
}

impl ArenaStats {
    pub fn total_blocks(&self) -> usize {
        self.classes.iter().map(|c| c.blocks).sum()
    }

    pub fn total_live(&self) -> usize {
        self.classes.iter().map(|c| c.live).sum()
    }

    /// Stats of the slab class serving `obj_size`, if any.
    pub fn class_for(&self, obj_size: usize) -> Option<&ClassStats> {
        let idx = SIZE_CLASSES.iter().position(|&c| c >= obj_size)?;
        self.classes.get(idx)
    }

    pub fn large(&self) -> Option<&ClassStats> {
        self.classes.get(LARGE_CLASS as usize)
    }
}

pub struct Arena<T> {
    config: ArenaConfig,
    pools: Vec<Pool<T>>,
    chunks: usize,
    chunk_blocks_left: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::build(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Result<Self, AllocError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ArenaConfig) -> Self {
        let mut pools: Vec<Pool<T>> = SIZE_CLASSES
            .iter()
            .map(|&obj_size| Pool {
                obj_size,
                slots_per_block: config.slots_per_block(obj_size),
                blocks: Vec::new(),
                cursor: 0,
            })
            .collect();
        pools.push(Pool {
            obj_size: LARGE_OBJECT_LIMIT,
            slots_per_block: LARGE_SLOTS_PER_BLOCK,
            blocks: Vec::new(),
            cursor: 0,
        });
        let mut arena = Self {
            config,
            pools,
            chunks: 0,
            chunk_blocks_left: 0,
        };
        arena.acquire_chunk();
        for class in 0..SIZE_CLASSES.len() {
            arena.grow(class);
        }
        arena
    }

    pub fn config(&self) -> ArenaConfig {
        self.config
    }

    /// Index of the pool that serves `size` bytes, or `None` above the limit.
    pub fn size_class(size: usize) -> Option<u8> {
        match SIZE_CLASSES.iter().position(|&c| c >= size) {
            Some(idx) => Some(idx as u8),
            None if size <= LARGE_OBJECT_LIMIT => Some(LARGE_CLASS),
            None => None,
        }
    }

    /// Place `value` in a free slot of the class that fits `size`.
    pub fn allocate(&mut self, size: usize, value: T) -> Result<ObjectId, AllocError> {
        let class = Self::size_class(size).ok_or(AllocError::BadSize(size))?;
        if class == LARGE_CLASS {
            tracing::trace!(size, "large object allocation");
        }
        let (block_idx, slot) = self.reserve(class as usize);
        let block = &mut self.pools[class as usize].blocks[block_idx];
        let generation = block.generations[slot].wrapping_add(1);
        block.generations[slot] = generation;
        block.slots[slot] = Some(value);
        Ok(ObjectId {
            block: block_idx as u32,
            generation,
            slot: slot as u16,
            class,
        })
    }

    fn reserve(&mut self, class: usize) -> (usize, usize) {
        loop {
            if let Some(found) = self.pools[class].scan() {
                return found;
            }
            self.grow(class);
        }
    }

    fn grow(&mut self, class: usize) {
        if class != LARGE_CLASS as usize {
            if self.chunk_blocks_left == 0 {
                self.acquire_chunk();
            }
            self.chunk_blocks_left -= 1;
        }
        let pool = &mut self.pools[class];
        pool.blocks.push(Block::new(pool.slots_per_block));
    }

    fn acquire_chunk(&mut self) {
        self.chunks += 1;
        self.chunk_blocks_left = self.config.blocks_per_chunk();
        tracing::debug!(
            chunks = self.chunks,
            blocks = self.chunk_blocks_left,
            "acquired arena chunk"
        );
    }

    /// Clear every liveness bit of every block; starts a collection cycle.
    pub fn mark_dead(&mut self) {
        for pool in &mut self.pools {
            for block in &mut pool.blocks {
                block.mark_dead();
            }
            pool.cursor = 0;
        }
    }

    /// Set the liveness bit of `id`, returning whether it was already set.
    pub fn mark_live(&mut self, id: ObjectId) -> bool {
        let block = &mut self.pools[id.class as usize].blocks[id.block as usize];
        assert_eq!(
            block.generations[id.slot as usize], id.generation,
            "marking stale object handle {id:?}"
        );
        block.mark_live(id.slot as usize)
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.pools
            .get(id.class as usize)
            .and_then(|p| p.blocks.get(id.block as usize))
            .is_some_and(|b| {
                b.generations.get(id.slot as usize) == Some(&id.generation)
                    && b.is_live(id.slot as usize)
            })
    }

    pub fn try_get(&self, id: ObjectId) -> Option<&T> {
        let block = self
            .pools
            .get(id.class as usize)?
            .blocks
            .get(id.block as usize)?;
        let idx = id.slot as usize;
        if *block.generations.get(idx)? != id.generation {
            return None;
        }
        block.slots[idx].as_ref()
    }

    pub fn get(&self, id: ObjectId) -> &T {
        match self.try_get(id) {
            Some(value) => value,
            None => panic!("stale object handle {id:?}"),
        }
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut T {
        let block = &mut self.pools[id.class as usize].blocks[id.block as usize];
        let idx = id.slot as usize;
        if block.generations[idx] != id.generation {
            panic!("stale object handle {id:?}");
        }
        match block.slots[idx].as_mut() {
            Some(value) => value,
            None => panic!("empty slot behind handle {id:?}"),
        }
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            chunks: self.chunks,
            classes: self
                .pools
                .iter()
                .map(|pool| ClassStats {
                    obj_size: pool.obj_size,
                    blocks: pool.blocks.len(),
                    capacity: pool.blocks.len() * pool.slots_per_block,
                    live: pool.blocks.iter().map(Block::live_count).sum(),
                })
                .collect(),
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
