use hash_store::{LayerDirectory, StoreError};

// The two-layer scenario: "layer1" and "layer2" round-trip unchanged
// through the directory.
#[test]
fn create_two_layers_and_read_back() {
    let mut dir = LayerDirectory::new();

    dir.create_layer("layer1", vec![1, 2, 3, 4, 5]).unwrap();
    dir.create_layer("layer2", vec![6, 7, 8, 9, 10]).unwrap();

    assert_eq!(dir.get_layer("layer1"), Some(&[1, 2, 3, 4, 5][..]));
    assert_eq!(dir.get_layer("layer2"), Some(&[6, 7, 8, 9, 10][..]));
    assert_eq!(dir.len(), 2);
}

// Names are kept as keys: even when every name lands on the same slot,
// layers never clobber each other and misses stay misses.
#[test]
fn collisions_resolve_by_name() {
    let mut dir = LayerDirectory::with_capacity(1);
    dir.create_layer("layer1", vec![1, 2, 3, 4, 5]).unwrap();
    dir.create_layer("layer2", vec![6, 7, 8, 9, 10]).unwrap();

    assert_eq!(dir.get_layer("layer1"), Some(&[1, 2, 3, 4, 5][..]));
    assert_eq!(dir.get_layer("layer2"), Some(&[6, 7, 8, 9, 10][..]));
    assert_eq!(dir.get_layer("layer3"), None);
}

// Re-creating a layer replaces its elements; creating with an empty name
// fails without storing anything.
#[test]
fn recreate_and_invalid_names() {
    let mut dir = LayerDirectory::new();
    dir.create_layer("layer1", vec![1, 2, 3]).unwrap();
    dir.create_layer("layer1", vec![4, 5]).unwrap();
    assert_eq!(dir.get_layer("layer1"), Some(&[4, 5][..]));
    assert_eq!(dir.len(), 1);

    assert_eq!(dir.create_layer("", vec![1]), Err(StoreError::InvalidKey));
    assert_eq!(dir.len(), 1);
}
