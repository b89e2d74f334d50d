//! ProbedStore: open addressing with quadratic reprobing.
//!
//! One entry per slot, never more. An occupied natural slot sends the
//! insert along the probe sequence `(natural + i*i) mod capacity` for
//! `i = 1..=capacity`; the first empty slot wins. Attempts are bounded
//! by capacity because quadratic sequences do not cover every slot for
//! arbitrary capacities, so an unbounded walk could spin forever.
//!
//! Lookup replays the same sequence insert used, stopping at the first
//! empty slot. Slots never empty out (no delete), so an empty slot
//! proves no earlier insert of that key probed past it.

use crate::error::StoreError;
use crate::hash::{Djb2, SlotHash, DEFAULT_CAPACITY};
use core::borrow::Borrow;
use tracing::trace;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Stable address of one resident entry: its slot index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotRef {
    slot: usize,
}

impl SlotRef {
    /// Slot index the entry resides in; differs from the natural index
    /// when the entry was displaced by probing.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn key<'a, K, V, H>(&self, store: &'a ProbedStore<K, V, H>) -> Option<&'a K> {
        store.entry(*self).map(|e| &e.key)
    }

    pub fn value<'a, K, V, H>(&self, store: &'a ProbedStore<K, V, H>) -> Option<&'a V> {
        store.entry(*self).map(|e| &e.value)
    }

    pub fn value_mut<'a, K, V, H>(
        &self,
        store: &'a mut ProbedStore<K, V, H>,
    ) -> Option<&'a mut V> {
        store.entry_mut(*self).map(|e| &mut e.value)
    }
}

/// How the natural slot relates to an incoming key. Both occupied cases
/// send the insert probing: a re-inserted key is displaced to a fresh
/// slot rather than rejected or overwritten.
#[derive(Debug)]
enum SlotState {
    Free,
    SameKey,
    DifferentKey,
}

/// Fixed-capacity store resolving collisions by quadratic probing.
pub struct ProbedStore<K, V, H = Djb2> {
    slots: Vec<Option<Entry<K, V>>>,
    len: usize,
    hash: H,
}

impl<K, V, H> ProbedStore<K, V, H>
where
    K: Eq,
    H: SlotHash<K> + Default,
{
    /// Store with [`DEFAULT_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Store with `capacity` slots; 0 substitutes [`DEFAULT_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hash(capacity, H::default())
    }
}

impl<K, V, H> Default for ProbedStore<K, V, H>
where
    K: Eq,
    H: SlotHash<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> ProbedStore<K, V, H>
where
    K: Eq,
    H: SlotHash<K>,
{
    pub fn with_capacity_and_hash(capacity: usize, hash: H) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            len: 0,
            hash,
        }
    }

    /// Number of slots; also the hard cap on resident entries.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of resident entries; at most `capacity`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Write an entry at the key's natural slot, probing on collision.
    ///
    /// Fails with `CapacityExhausted` when the store is full or the
    /// probe sequence finds no empty slot within `capacity` attempts
    /// (possible while free slots remain: quadratic offsets may never
    /// reach them). Failure leaves the store untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<SlotRef, StoreError> {
        if !self.hash.validate(&key) {
            return Err(StoreError::InvalidKey);
        }
        if self.len >= self.slots.len() {
            return Err(StoreError::CapacityExhausted);
        }
        let natural = self.hash.slot_index(&key, self.slots.len());
        let slot = match self.classify(natural, &key) {
            SlotState::Free => natural,
            state => {
                let probed = self
                    .probe(natural)
                    .ok_or(StoreError::CapacityExhausted)?;
                trace!(natural, probed, ?state, "collision; entry displaced by probe");
                probed
            }
        };
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(Entry { key, value });
        self.len += 1;
        Ok(SlotRef { slot })
    }

    /// Find a key by replaying the insert probe sequence.
    ///
    /// Visits the natural slot, then the quadratic offsets in insert
    /// order. Returns the earliest inserted entry for the key; stops at
    /// the first empty slot or after `capacity` attempts.
    pub fn lookup<Q>(&self, key: &Q) -> Option<SlotRef>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHash<Q>,
    {
        // Qualified calls: H is a SlotHash for both K and Q here.
        if !<H as SlotHash<Q>>::validate(&self.hash, key) {
            return None;
        }
        let capacity = self.slots.len();
        let natural = <H as SlotHash<Q>>::slot_index(&self.hash, key, capacity);
        let sequence =
            std::iter::once(natural).chain((1..=capacity as u64).map(|i| offset(natural, i, capacity)));
        for slot in sequence {
            match &self.slots[slot] {
                // Slots never empty out, so no insert of this key ever
                // probed past this point.
                None => return None,
                Some(e) if e.key.borrow() == key => return Some(SlotRef { slot }),
                Some(_) => {}
            }
        }
        None
    }

    /// Value of the earliest matching entry, without going through a ref.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHash<Q>,
    {
        let r = self.lookup(key)?;
        self.entry(r).map(|e| &e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHash<Q>,
    {
        self.lookup(key).is_some()
    }

    fn classify(&self, slot: usize, key: &K) -> SlotState {
        match &self.slots[slot] {
            None => SlotState::Free,
            Some(e) if e.key == *key => SlotState::SameKey,
            Some(_) => SlotState::DifferentKey,
        }
    }

    /// First empty slot along the quadratic sequence, if any attempt
    /// within the capacity bound reaches one.
    fn probe(&self, natural: usize) -> Option<usize> {
        let capacity = self.slots.len();
        (1..=capacity as u64)
            .map(|i| offset(natural, i, capacity))
            .find(|&slot| self.slots[slot].is_none())
    }
}

// Resolution by ref needs no key bounds at all.
impl<K, V, H> ProbedStore<K, V, H> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            slot: 0,
        }
    }

    fn entry(&self, r: SlotRef) -> Option<&Entry<K, V>> {
        self.slots.get(r.slot).and_then(|s| s.as_ref())
    }

    fn entry_mut(&mut self, r: SlotRef) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(r.slot).and_then(|s| s.as_mut())
    }
}

/// `(natural + attempt^2) mod capacity` in u64 so the square cannot
/// overflow for any realistic capacity.
fn offset(natural: usize, attempt: u64, capacity: usize) -> usize {
    let squared = attempt.wrapping_mul(attempt);
    ((natural as u64).wrapping_add(squared) % capacity as u64) as usize
}

/// Iterator over resident entries in slot order.
pub struct Iter<'a, K, V> {
    slots: &'a [Option<Entry<K, V>>],
    slot: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (SlotRef, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.slot < self.slots.len() {
            let slot = self.slot;
            self.slot += 1;
            if let Some(e) = &self.slots[slot] {
                return Some((SlotRef { slot }, &e.key, &e.value));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    // Sends every key to one fixed natural index; the probing analogue of
    // a constant hasher.
    #[derive(Clone, Copy, Debug, Default)]
    struct PinnedHash(usize);

    impl<K: ?Sized> SlotHash<K> for PinnedHash {
        fn slot_index(&self, _key: &K, capacity: usize) -> usize {
            self.0 % capacity
        }
    }

    /// Invariant: inserted pairs round-trip, including entries displaced
    /// by probing. "a", "c", "e" all hash to slot 0 of a 2-slot table
    /// under DJB2 (even accumulator values).
    #[test]
    fn displaced_entry_is_still_found() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(2);
        let ra = store.insert("a".to_string(), 1).unwrap();
        let rc = store.insert("c".to_string(), 3).unwrap();
        assert_ne!(ra.slot(), rc.slot());
        assert_eq!(store.get("a"), Some(&1));
        assert_eq!(store.get("c"), Some(&3));
        assert_eq!(store.lookup("c"), Some(rc));
    }

    /// Invariant: a full store rejects a third insert cleanly; prior
    /// entries and the length are unchanged.
    #[test]
    fn capacity_exhaustion_is_clean() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(2);
        store.insert("a".to_string(), 1).unwrap();
        store.insert("c".to_string(), 3).unwrap();
        assert_eq!(
            store.insert("e".to_string(), 5),
            Err(StoreError::CapacityExhausted)
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some(&1));
        assert_eq!(store.get("c"), Some(&3));
        assert_eq!(store.lookup("e"), None);
    }

    /// Invariant: no two live entries ever share a slot. Inserts may hit
    /// probe exhaustion (quadratic offsets can miss free slots), but any
    /// successful insert lands on a slot of its own.
    #[test]
    fn resident_slots_are_distinct() {
        let mut store: ProbedStore<String, usize> = ProbedStore::with_capacity(32);
        let mut slots = BTreeSet::new();
        for i in 0..16 {
            match store.insert(format!("key{i}"), i) {
                Ok(r) => assert!(slots.insert(r.slot()), "slot occupied twice"),
                Err(StoreError::CapacityExhausted) => {}
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }
        assert_eq!(store.len(), slots.len());
        assert!(!slots.is_empty(), "first insert always lands");
    }

    /// Invariant: re-inserting a present key is treated as a collision:
    /// it consumes a fresh slot and lookup keeps returning the earliest
    /// entry.
    #[test]
    fn duplicate_key_is_displaced_not_replaced() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(8);
        let first = store.insert("dup".to_string(), 1).unwrap();
        let second = store.insert("dup".to_string(), 2).unwrap();
        assert_ne!(first.slot(), second.slot());
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("dup"), Some(first));
        assert_eq!(store.get("dup"), Some(&1));
        assert_eq!(second.value(&store), Some(&2));
    }

    /// Invariant: the probe sequence is bounded by capacity and may fail
    /// while free slots remain. With capacity 4 and every key pinned to
    /// slot 0, quadratic offsets only ever reach slots 0 and 1.
    #[test]
    fn probe_sequence_can_exhaust_before_full() {
        let mut store: ProbedStore<String, i32, PinnedHash> =
            ProbedStore::with_capacity_and_hash(4, PinnedHash(0));
        store.insert("k1".to_string(), 1).unwrap();
        store.insert("k2".to_string(), 2).unwrap();
        assert_eq!(
            store.insert("k3".to_string(), 3),
            Err(StoreError::CapacityExhausted)
        );
        assert_eq!(store.len(), 2);
        // Slots 2 and 3 are free but unreachable from natural index 0.
        assert_eq!(store.get("k1"), Some(&1));
        assert_eq!(store.get("k2"), Some(&2));
    }

    /// Invariant: a miss among collisions terminates; an absent key whose
    /// natural slot is occupied walks the sequence and returns `None`.
    #[test]
    fn miss_with_occupied_natural_slot() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(2);
        store.insert("a".to_string(), 1).unwrap();
        // "c" hashes to the same natural slot as "a" but was never inserted.
        assert_eq!(store.lookup("c"), None);
        store.insert("c".to_string(), 3).unwrap();
        // Full table, absent colliding key: bounded walk, still a miss.
        assert_eq!(store.lookup("e"), None);
    }

    /// Invariant: an empty key is rejected before any mutation.
    #[test]
    fn empty_key_is_invalid() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(4);
        assert_eq!(store.insert(String::new(), 1), Err(StoreError::InvalidKey));
        assert!(store.is_empty());
        assert_eq!(store.lookup(""), None);
    }

    /// Invariant: capacity 0 substitutes the default.
    #[test]
    fn zero_capacity_substitutes_default() {
        let store: ProbedStore<String, i32> = ProbedStore::with_capacity(0);
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
        let store: ProbedStore<String, i32> = ProbedStore::new();
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
    }

    /// Invariant: a single-slot store holds exactly one entry.
    #[test]
    fn capacity_one_fills_immediately() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(1);
        store.insert("only".to_string(), 1).unwrap();
        assert_eq!(
            store.insert("next".to_string(), 2),
            Err(StoreError::CapacityExhausted)
        );
        assert_eq!(store.get("only"), Some(&1));
    }

    /// Invariant: ref access resolves and `value_mut` updates are visible
    /// to later lookups.
    #[test]
    fn ref_access_and_mutation() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(8);
        let r = store.insert("k1".to_string(), 10).unwrap();
        assert_eq!(r.key(&store), Some(&"k1".to_string()));
        *r.value_mut(&mut store).unwrap() += 5;
        assert_eq!(store.get("k1"), Some(&15));
    }

    /// Invariant: iteration yields each resident entry exactly once.
    #[test]
    fn iter_yields_every_entry_once() {
        let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(8);
        let keys = ["k1", "k2", "k3"];
        for (i, k) in keys.iter().enumerate() {
            store.insert((*k).to_string(), i as i32).unwrap();
        }
        let seen: BTreeSet<String> = store.iter().map(|(_r, k, _v)| k.clone()).collect();
        let expected: BTreeSet<String> = keys.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(seen, expected);
        assert_eq!(store.iter().count(), store.len());
    }
}
