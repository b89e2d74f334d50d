//! ChainedStore: separate chaining over a fixed-capacity slot array.
//!
//! Every slot owns a `Vec` of entries that hashed to it. Collisions
//! append to the tail, duplicate keys are allowed (two inserts of one
//! key leave two entries), and lookup returns the first match in chain
//! order. Chains are never trimmed: no delete exists and entries live
//! until the store drops.

use crate::error::StoreError;
use crate::hash::{Djb2, SlotHash, DEFAULT_CAPACITY};
use core::borrow::Borrow;
use tracing::trace;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Stable address of one entry: slot index plus position in the chain.
///
/// Chains only grow, so a `ChainRef` stays valid for the life of the
/// store and resolves without re-hashing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChainRef {
    slot: usize,
    pos: usize,
}

impl ChainRef {
    /// Slot index the entry resides in.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn key<'a, K, V, H>(&self, store: &'a ChainedStore<K, V, H>) -> Option<&'a K> {
        store.entry(*self).map(|e| &e.key)
    }

    pub fn value<'a, K, V, H>(&self, store: &'a ChainedStore<K, V, H>) -> Option<&'a V> {
        store.entry(*self).map(|e| &e.value)
    }

    pub fn value_mut<'a, K, V, H>(
        &self,
        store: &'a mut ChainedStore<K, V, H>,
    ) -> Option<&'a mut V> {
        store.entry_mut(*self).map(|e| &mut e.value)
    }
}

/// Fixed-capacity store resolving collisions by separate chaining.
pub struct ChainedStore<K, V, H = Djb2> {
    slots: Vec<Vec<Entry<K, V>>>,
    len: usize,
    hash: H,
}

impl<K, V, H> ChainedStore<K, V, H>
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

impl<K, V, H> Default for ChainedStore<K, V, H>
where
    K: Eq,
    H: SlotHash<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> ChainedStore<K, V, H>
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
            slots: std::iter::repeat_with(Vec::new).take(capacity).collect(),
            len: 0,
            hash,
        }
    }

    /// Number of slots; fixed for the life of the store.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of resident entries across all chains.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append an entry at the key's natural slot.
    ///
    /// Never deduplicates: inserting an already-present key grows that
    /// chain by one and lookup keeps returning the earliest entry.
    pub fn insert(&mut self, key: K, value: V) -> Result<ChainRef, StoreError> {
        if !self.hash.validate(&key) {
            return Err(StoreError::InvalidKey);
        }
        let slot = self.hash.slot_index(&key, self.slots.len());
        let chain = &mut self.slots[slot];
        if !chain.is_empty() {
            trace!(slot, depth = chain.len(), "slot occupied; appending to chain");
        }
        chain.push(Entry { key, value });
        self.len += 1;
        Ok(ChainRef {
            slot,
            pos: chain.len() - 1,
        })
    }

    /// First entry in chain order whose key equals `key`.
    pub fn lookup<Q>(&self, key: &Q) -> Option<ChainRef>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: SlotHash<Q>,
    {
        // Qualified calls: H is a SlotHash for both K and Q here.
        if !<H as SlotHash<Q>>::validate(&self.hash, key) {
            return None;
        }
        let slot = <H as SlotHash<Q>>::slot_index(&self.hash, key, self.slots.len());
        self.slots[slot]
            .iter()
            .position(|e| e.key.borrow() == key)
            .map(|pos| ChainRef { slot, pos })
    }

    /// Value of the first matching entry, without going through a ref.
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

    /// Depth of the chain at the key's natural slot (0 when empty).
    pub fn chain_len<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: SlotHash<Q>,
    {
        if !<H as SlotHash<Q>>::validate(&self.hash, key) {
            return 0;
        }
        self.slots[<H as SlotHash<Q>>::slot_index(&self.hash, key, self.slots.len())].len()
    }
}

// Resolution by ref needs no key bounds at all.
impl<K, V, H> ChainedStore<K, V, H> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            slot: 0,
            pos: 0,
        }
    }

    fn entry(&self, r: ChainRef) -> Option<&Entry<K, V>> {
        self.slots.get(r.slot).and_then(|chain| chain.get(r.pos))
    }

    fn entry_mut(&mut self, r: ChainRef) -> Option<&mut Entry<K, V>> {
        self.slots
            .get_mut(r.slot)
            .and_then(|chain| chain.get_mut(r.pos))
    }
}

/// Iterator over entries in slot order, then chain order.
pub struct Iter<'a, K, V> {
    slots: &'a [Vec<Entry<K, V>>],
    slot: usize,
    pos: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (ChainRef, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.slot < self.slots.len() {
            if let Some(e) = self.slots[self.slot].get(self.pos) {
                let r = ChainRef {
                    slot: self.slot,
                    pos: self.pos,
                };
                self.pos += 1;
                return Some((r, &e.key, &e.value));
            }
            self.slot += 1;
            self.pos = 0;
        }
        None
    }
}
