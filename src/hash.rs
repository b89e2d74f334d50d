//! Pluggable hash functions mapping keys to slot indices.

use crate::arena::KeyId;

/// Capacity substituted when a store is created with capacity 0.
pub const DEFAULT_CAPACITY: usize = 512;

/// A hash function that addresses slots in a fixed-capacity table.
///
/// The hash function is the only component that interprets keys, so it
/// also owns key validation: stores call `validate` before touching any
/// slot and reject invalid keys without partial effects.
pub trait SlotHash<K: ?Sized> {
    /// Natural index for `key` in a table of `capacity` slots.
    ///
    /// Callers guarantee `capacity > 0`; the stores substitute
    /// [`DEFAULT_CAPACITY`] at construction so this always holds.
    fn slot_index(&self, key: &K, capacity: usize) -> usize;

    /// Whether `key` is acceptable at all. Run before any mutation.
    fn validate(&self, key: &K) -> bool {
        let _ = key;
        true
    }
}

/// DJB2 accumulator over a byte string.
///
/// `h = 5381; h = h * 33 + byte` with wrapping arithmetic, matching the
/// classic formulation byte for byte. Deterministic across processes.
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &byte in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

/// DJB2-based slot addressing for string-like keys.
///
/// Empty keys are invalid: an empty byte string cannot be told apart
/// from an absent one at this boundary.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Djb2;

impl<K> SlotHash<K> for Djb2
where
    K: AsRef<[u8]> + ?Sized,
{
    fn slot_index(&self, key: &K, capacity: usize) -> usize {
        (djb2(key.as_ref()) % capacity as u64) as usize
    }

    fn validate(&self, key: &K) -> bool {
        !key.as_ref().is_empty()
    }
}

/// Slot addressing over a key's stable identity rather than its contents.
///
/// Hashes the integer id issued by a [`KeyArena`](crate::KeyArena), so two
/// logically equal values allocated separately land on independent slots.
/// Deterministic for the lifetime of the arena that issued the id.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct IdentityHash;

impl SlotHash<KeyId> for IdentityHash {
    fn slot_index(&self, key: &KeyId, capacity: usize) -> usize {
        (key.as_u64() % capacity as u64) as usize
    }
}
