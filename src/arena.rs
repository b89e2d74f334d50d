//! Stable identities for identity-keyed stores.
//!
//! Hashing a value's memory address only works while nothing moves, and a
//! freed address can be handed to an unrelated value later. The arena
//! replaces addresses with opaque integer ids backed by generational
//! keys: an id stays valid wherever the arena moves, and a slot reused
//! for a new value gets a bumped generation, so stale ids never resolve
//! to the wrong value.

use slotmap::{DefaultKey, Key, SlotMap};

/// Stable opaque identity of a value allocated in a [`KeyArena`].
///
/// This is the key type hashed by
/// [`IdentityHash`](crate::hash::IdentityHash): identity, not contents.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct KeyId(DefaultKey);

impl KeyId {
    pub(crate) fn new(key: DefaultKey) -> Self {
        KeyId(key)
    }

    /// Stable integer form of the identity (index plus generation).
    pub fn as_u64(self) -> u64 {
        self.0.data().as_ffi()
    }
}

/// Arena that owns values and issues a [`KeyId`] per allocation.
pub struct KeyArena<T> {
    values: SlotMap<DefaultKey, T>,
}

impl<T> KeyArena<T> {
    pub fn new() -> Self {
        Self {
            values: SlotMap::with_key(),
        }
    }

    /// Take ownership of `value` and return its identity.
    pub fn alloc(&mut self, value: T) -> KeyId {
        KeyId::new(self.values.insert(value))
    }

    pub fn get(&self, id: KeyId) -> Option<&T> {
        self.values.get(id.0)
    }

    pub fn get_mut(&mut self, id: KeyId) -> Option<&mut T> {
        self.values.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for KeyArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
