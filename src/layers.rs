//! LayerDirectory: named integer arrays addressed by string hash.
//!
//! A thin usage pattern over [`ChainedStore`]: layer names are DJB2-hashed
//! into a 1024-slot table and kept as keys, so names that collide on a
//! slot chain instead of clobbering each other. Re-creating an existing
//! name replaces that layer's elements; distinct names never interfere.

use crate::chained::ChainedStore;
use crate::error::StoreError;
use crate::hash::Djb2;
use tracing::trace;

/// Default number of directory slots.
pub const LAYER_DIRECTORY_SLOTS: usize = 1024;

/// Directory of named integer arrays ("express layers").
pub struct LayerDirectory {
    layers: ChainedStore<String, Vec<i64>, Djb2>,
}

impl LayerDirectory {
    /// Directory with [`LAYER_DIRECTORY_SLOTS`] slots.
    pub fn new() -> Self {
        Self::with_capacity(LAYER_DIRECTORY_SLOTS)
    }

    /// Directory with `capacity` slots; 0 substitutes the default.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            LAYER_DIRECTORY_SLOTS
        } else {
            capacity
        };
        Self {
            layers: ChainedStore::with_capacity(capacity),
        }
    }

    /// Create a layer, or replace the elements of an existing one.
    ///
    /// An empty name is `InvalidKey`; nothing is stored for it.
    pub fn create_layer(&mut self, name: &str, elements: Vec<i64>) -> Result<(), StoreError> {
        match self.layers.lookup(name) {
            Some(r) => {
                trace!(name, "replacing elements of existing layer");
                if let Some(v) = r.value_mut(&mut self.layers) {
                    *v = elements;
                }
                Ok(())
            }
            None => self.layers.insert(name.to_owned(), elements).map(|_| ()),
        }
    }

    /// Elements of the layer with exactly this name, if one exists.
    pub fn get_layer(&self, name: &str) -> Option<&[i64]> {
        self.layers.get(name).map(Vec::as_slice)
    }

    pub fn contains_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Number of layers (replacements do not add).
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.layers.capacity()
    }

    /// Iterate layers as (name, elements), in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.layers
            .iter()
            .map(|(_r, name, elements)| (name.as_str(), elements.as_slice()))
    }
}

impl Default for LayerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
