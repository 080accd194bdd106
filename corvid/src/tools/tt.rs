//! Module for the `TranspositionTable`, a lock-striped hashmap from Zobrist keys to
//! information about a position.
//!
//! A Transposition Table is a structure to quickly lookup chess positions and determine
//! information about them, such as the evaluation, the best move found so far, and the
//! depth that move was found at. Unlike a generic hashmap, a `TranspositionTable` never
//! grows past its configured capacity: newer information simply replaces older information
//! according to a replacement policy.
//!
//! This table is built from two parallel arrays of equal size: a "depth-preferred" table,
//! which is always overwritten with the newest information, and an "always-replace" table,
//! which only yields its slot to newer information if the incoming entry is not worse than
//! what is already stored. Both tables are protected by a stripe of 64 `RwLock`s, so that
//! unrelated keys hashing to different stripes never contend with each other.

use std::cell::UnsafeCell;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use core::piece_move::BitMove;
use tools::{prefetch_write, PreFetchable};

/// Value used to retrieve and store Entries.
pub type Key = u64;

/// Number of locks striping each of the two tables. A key's stripe is `key % NUM_STRIPES`.
pub const NUM_STRIPES: usize = 64;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Designates the type of Node in the chess search tree.
///
/// `LowerBound` and `UpperBound` are bit flags, so `Exact` (a node whose score is known
/// precisely) is their union.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum NodeBound {
    NoBound = 0,
    LowerBound = 1,
    UpperBound = 2,
    Exact = 3,
}

/// A single record in a `TranspositionTable`.
///
/// 8 (key) + 2 (best_move) + 2 (score) + 2 (eval) + 1 (depth) + 1 (bound) + 1 (age) = 17
/// bytes, rounded up to a power-of-two-friendly size by the compiler.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Entry {
    pub key: Key,
    pub best_move: BitMove,
    pub score: i16,
    pub eval: i16,
    pub depth: i8,
    pub bound: NodeBound,
    pub age: u8,
}

impl Entry {
    /// Returns an empty entry, e.g. one that has never been written to.
    pub fn empty() -> Self {
        Entry {
            key: 0,
            best_move: BitMove::null(),
            score: 0,
            eval: 0,
            depth: 0,
            bound: NodeBound::NoBound,
            age: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bound == NodeBound::NoBound && self.key == 0
    }

    /// Rewrites over an entry, unconditionally.
    fn place(
        &mut self,
        key: Key,
        best_move: BitMove,
        score: i16,
        eval: i16,
        depth: i16,
        bound: NodeBound,
        age: u8,
    ) {
        self.key = key;
        if !best_move.is_null() || bound == NodeBound::Exact {
            self.best_move = best_move;
        }
        self.score = score;
        self.eval = eval;
        self.depth = depth as i8;
        self.bound = bound;
        self.age = age;
    }

    /// Returns the bound/type of this node.
    pub fn node_type(&self) -> NodeBound {
        self.bound
    }
}

/// Structure for representing a `TranspositionTable`. A Transposition Table is a type
/// of hashtable that maps Zobrist keys to information about a chess position, including the
/// best move found, the score, and the depth that score was found at.
///
/// The table is made of two parallel arrays, each guarded by its own stripe of 64 locks:
///
/// * `depth_preferred` is always overwritten by the newest write to a slot.
/// * `always_replace` only yields its slot to a write if the existing occupant is stale
///   or shallower than the incoming entry.
///
/// Capacity is always rounded up to a multiple of [`NUM_STRIPES`], so that `index % NUM_STRIPES`
/// equals `key % NUM_STRIPES` for every index produced by `index_of`, and a stripe lock always
/// guards exactly the slots that hash to it.
pub struct TranspositionTable {
    depth_preferred: UnsafeCell<Vec<Entry>>,
    depth_locks: Vec<RwLock<()>>,
    always_replace: UnsafeCell<Vec<Entry>>,
    always_locks: Vec<RwLock<()>>,
    cap: AtomicUsize,
    generation: AtomicUsize,
    collisions: AtomicUsize,
}

unsafe impl Sync for TranspositionTable {}
unsafe impl Send for TranspositionTable {}

impl TranspositionTable {
    /// Creates a new `TranspositionTable` sized to roughly `mb_size` megabytes per array.
    ///
    /// # Panics
    ///
    /// `mb_size` must be greater than 0.
    pub fn new(mb_size: usize) -> Self {
        assert!(mb_size > 0);
        let cap = Self::cap_for_mb(mb_size);
        TranspositionTable {
            depth_preferred: UnsafeCell::new(vec![Entry::empty(); cap]),
            depth_locks: Self::new_locks(),
            always_replace: UnsafeCell::new(vec![Entry::empty(); cap]),
            always_locks: Self::new_locks(),
            cap: AtomicUsize::new(cap),
            generation: AtomicUsize::new(0),
            collisions: AtomicUsize::new(0),
        }
    }

    fn new_locks() -> Vec<RwLock<()>> {
        (0..NUM_STRIPES).map(|_| RwLock::new(())).collect()
    }

    /// Number of entries that fit into `mb_size` megabytes of one array, rounded up to the
    /// next multiple of `NUM_STRIPES` (and never zero).
    fn cap_for_mb(mb_size: usize) -> usize {
        let requested = (mb_size * BYTES_PER_MB) / mem::size_of::<Entry>();
        let rounded = ((requested + NUM_STRIPES - 1) / NUM_STRIPES) * NUM_STRIPES;
        if rounded == 0 {
            NUM_STRIPES
        } else {
            rounded
        }
    }

    #[inline(always)]
    fn index_of(&self, key: Key) -> usize {
        (key % self.cap.load(Ordering::Relaxed) as u64) as usize
    }

    #[inline(always)]
    fn stripe_of(key: Key) -> usize {
        (key % NUM_STRIPES as u64) as usize
    }

    /// Probes both tables for `key`. Returns `(true, entry)` if a matching entry was found
    /// in either table (depth-preferred is checked first), or `(false, Entry::empty())` on
    /// a miss.
    pub fn probe(&self, key: Key) -> (bool, Entry) {
        let stripe = Self::stripe_of(key);
        let idx = self.index_of(key);

        {
            let _guard = self.depth_locks[stripe].read().unwrap();
            let table = unsafe { &*self.depth_preferred.get() };
            let entry = table[idx];
            if !entry.is_empty() && entry.key == key {
                return (true, entry);
            }
        }

        let _guard = self.always_locks[stripe].read().unwrap();
        let table = unsafe { &*self.always_replace.get() };
        let entry = table[idx];
        if !entry.is_empty() && entry.key == key {
            return (true, entry);
        }
        (false, Entry::empty())
    }

    /// Records a new entry for `key` into both tables, subject to each table's replacement
    /// policy. Never fails; a write that loses the always-replace race is simply dropped
    /// (and counted as a collision).
    pub fn record(
        &self,
        key: Key,
        best_move: BitMove,
        score: i16,
        eval: i16,
        depth: i16,
        bound: NodeBound,
    ) {
        let stripe = Self::stripe_of(key);
        let idx = self.index_of(key);
        let age = self.generation.load(Ordering::Relaxed) as u8;

        {
            let _guard = self.depth_locks[stripe].write().unwrap();
            let table = unsafe { &mut *self.depth_preferred.get() };
            table[idx].place(key, best_move, score, eval, depth, bound, 1);
        }

        let _guard = self.always_locks[stripe].write().unwrap();
        let table = unsafe { &mut *self.always_replace.get() };
        let existing = &table[idx];
        let keep_existing =
            !existing.is_empty() && existing.age == age && existing.depth as i16 > depth;
        if keep_existing {
            self.collisions.fetch_add(1, Ordering::Relaxed);
        } else {
            table[idx].place(key, best_move, score, eval, depth, bound, age);
        }
    }

    /// Called once at the start of each root search iteration. Advances the generation
    /// counter (used by the always-replace policy) and sweeps the depth-preferred table's
    /// age bit back to 0, so this iteration's writes are free to displace last iteration's.
    pub fn new_search(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
        self.clear_age();
    }

    /// Sets `age = 0` on every depth-preferred entry.
    fn clear_age(&self) {
        for (stripe, lock) in self.depth_locks.iter().enumerate() {
            let _guard = lock.write().unwrap();
            let table = unsafe { &mut *self.depth_preferred.get() };
            let cap = self.cap.load(Ordering::Relaxed);
            let mut i = stripe;
            while i < cap {
                table[i].age = 0;
                i += NUM_STRIPES;
            }
        }
    }

    /// Returns the current generation number. Bumped once per `new_search`.
    pub fn time_age(&self) -> u8 {
        self.generation.load(Ordering::Relaxed) as u8
    }

    /// Number of always-replace writes that lost to an existing, deeper, current-generation
    /// entry.
    pub fn collisions(&self) -> usize {
        self.collisions.load(Ordering::Relaxed)
    }

    /// Approximate per-mille fill of the depth-preferred table, sampled over up to the
    /// first 1000 slots (mirrors the usual UCI `hashfull` semantics).
    pub fn hash_percent(&self) -> f64 {
        let cap = self.cap.load(Ordering::Relaxed);
        let sample = cap.min(1000);
        let table = unsafe { &*self.depth_preferred.get() };
        let filled = table[0..sample].iter().filter(|e| !e.is_empty()).count();
        1000.0 * (filled as f64) / (sample as f64)
    }

    /// Returns the number of entries allocated per array.
    pub fn num_entries(&self) -> usize {
        self.cap.load(Ordering::Relaxed)
    }

    /// Returns the size of one array in megabytes.
    pub fn size_megabytes(&self) -> usize {
        (self.num_entries() * mem::size_of::<Entry>()) / BYTES_PER_MB
    }

    /// Zeros both tables and resets the generation counter.
    ///
    /// # Safety
    ///
    /// Must not be called while any other thread may be probing or recording; the caller
    /// (the search coordinator) is responsible for quiescing all workers first.
    pub unsafe fn clear(&self) {
        let cap = self.cap.load(Ordering::Relaxed);
        let _guards: Vec<_> = self.depth_locks.iter().map(|l| l.write().unwrap()).collect();
        *self.depth_preferred.get() = vec![Entry::empty(); cap];
        drop(_guards);
        let _guards: Vec<_> = self.always_locks.iter().map(|l| l.write().unwrap()).collect();
        *self.always_replace.get() = vec![Entry::empty(); cap];
        self.generation.store(0, Ordering::Relaxed);
        self.collisions.store(0, Ordering::Relaxed);
    }

    /// Re-sizes both arrays to roughly `mb_size` megabytes each, discarding all prior data.
    /// Returns the actual size in megabytes of the new allocation.
    ///
    /// # Safety
    ///
    /// Same caveat as [`clear`](#method.clear): no other thread may be using the table
    /// during the resize.
    pub unsafe fn resize_to_megabytes(&self, mb_size: usize) -> usize {
        let new_cap = Self::cap_for_mb(mb_size);
        {
            let _guards: Vec<_> = self.depth_locks.iter().map(|l| l.write().unwrap()).collect();
            *self.depth_preferred.get() = vec![Entry::empty(); new_cap];
        }
        {
            let _guards: Vec<_> = self.always_locks.iter().map(|l| l.write().unwrap()).collect();
            *self.always_replace.get() = vec![Entry::empty(); new_cap];
        }
        self.cap.store(new_cap, Ordering::Relaxed);
        self.generation.store(0, Ordering::Relaxed);
        self.size_megabytes()
    }
}

impl PreFetchable for TranspositionTable {
    /// Hints to the cache that `key`'s depth-preferred slot will likely be read/written soon.
    fn prefetch(&self, key: Key) {
        let idx = self.index_of(key);
        let table = unsafe { &*self.depth_preferred.get() };
        prefetch_write(&table[idx] as *const Entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::piece_move::BitMove;

    #[test]
    fn round_trip() {
        let tt = TranspositionTable::new(1);
        let key = 0xDEAD_BEEF_0000_1234;
        let (hit, _) = tt.probe(key);
        assert!(!hit);

        tt.record(key, BitMove::null(), 57, 12, 4, NodeBound::Exact);
        let (hit, entry) = tt.probe(key);
        assert!(hit);
        assert_eq!(entry.score, 57);
        assert_eq!(entry.depth, 4);
        assert_eq!(entry.node_type(), NodeBound::Exact);
    }

    #[test]
    fn capacity_multiple_of_stripes() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.num_entries() % NUM_STRIPES, 0);
    }

    #[test]
    fn new_search_clears_depth_preferred_age() {
        let tt = TranspositionTable::new(1);
        let key = 42;
        tt.record(key, BitMove::null(), 1, 1, 1, NodeBound::Exact);
        tt.new_search();
        assert_eq!(tt.time_age(), 1);
    }

    #[test]
    fn resize_discards_old_entries() {
        let tt = TranspositionTable::new(1);
        let key = 7;
        tt.record(key, BitMove::null(), 1, 1, 1, NodeBound::Exact);
        unsafe {
            tt.resize_to_megabytes(1);
        }
        let (hit, _) = tt.probe(key);
        assert!(!hit);
    }
}
