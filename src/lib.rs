//! hash-store: fixed-capacity, hash-indexed associative stores with
//! pluggable hash functions and two collision policies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one slot-addressing core, exercised through two collision
//!   policies and a small directory built on top, so each policy can be
//!   reasoned about (and tested) independently.
//! - Layers:
//!   - SlotHash<K>: pluggable hash function mapping a key to a natural
//!     index in a table of fixed capacity; also owns key validation.
//!     Variants: Djb2 (byte-exact over string-like keys) and
//!     IdentityHash (over stable arena identities).
//!   - KeyArena<T> / KeyId: arena that issues stable opaque identities
//!     for values, replacing address-of-key hashing with generational
//!     ids that survive moves and are never reused for live values.
//!   - ChainedStore<K, V, H>: separate chaining; each slot owns a Vec
//!     of entries, collisions append, duplicates are allowed, lookup
//!     walks the chain. Unbounded entry count.
//!   - ProbedStore<K, V, H>: open addressing; one entry per slot,
//!     quadratic reprobing bounded by capacity, lookup replays the
//!     insert probe sequence. Entry count capped at capacity.
//!   - LayerDirectory: named integer arrays stored in a ChainedStore
//!     keyed by name, addressed with Djb2 over 1024 slots.
//!
//! Constraints
//! - Capacity is fixed at creation: no resize, no rehash. A requested
//!   capacity of 0 substitutes DEFAULT_CAPACITY (512).
//! - Insert-only: no delete, no eviction; entries live until the store
//!   is dropped.
//! - Single-threaded: mutation requires `&mut`, no internal locking;
//!   wrap a store in a Mutex for shared use.
//! - Errors are plain result values (InvalidKey, CapacityExhausted);
//!   lookup misses are `None`, never errors. Nothing panics.
//!
//! Why this split?
//! - Localize invariants: chaining ("chains only grow, first match
//!   wins") and probing ("slots never empty out, at most one entry per
//!   slot") have different contracts; keeping them in separate types
//!   means neither pays for the other's checks.
//! - The hash function is the only component that interprets keys, so
//!   key validation lives on SlotHash rather than on the stores.
//! - EntryRef-style handles (ChainRef, SlotRef) borrow nothing, so a
//!   successful insert or lookup can be retained and resolved later
//!   without re-hashing.
//!
//! Diagnostics
//! - Collision and probe events emit `tracing` trace events. They are a
//!   side channel only; no behavior depends on a subscriber being
//!   installed.
//!
//! Notes and non-goals
//! - No true skip list: LayerDirectory keeps named layers addressable
//!   by hash, nothing more. Ordered multi-level search is out of scope.
//! - IdentityHash hashes identity, not contents: two equal values
//!   allocated separately in a KeyArena get distinct ids and hash
//!   independently. This is a property of the variant, not a bug.
//! - Probed inserts of an already-present key still consume a fresh
//!   slot (duplicate keys and true collisions are classified alike);
//!   lookup returns the earliest inserted entry for the key.

mod chained_proptest;
mod error;
mod probed_proptest;
pub mod arena;
pub mod chained;
pub mod hash;
pub mod layers;
pub mod probed;

// Public surface
pub use arena::{KeyArena, KeyId};
pub use chained::{ChainRef, ChainedStore};
pub use error::StoreError;
pub use hash::{Djb2, IdentityHash, SlotHash, DEFAULT_CAPACITY};
pub use layers::{LayerDirectory, LAYER_DIRECTORY_SLOTS};
pub use probed::{ProbedStore, SlotRef};

/// Identity-keyed chained store: the pairing used for arena-allocated
/// values looked up by their `KeyId`.
pub type IdentityStore<V> = ChainedStore<KeyId, V, IdentityHash>;
