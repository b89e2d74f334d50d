use hash_store::{hash::djb2, ProbedStore, StoreError, DEFAULT_CAPACITY};

// The capacity-exhaustion scenario: two keys share a natural index in a
// 2-slot table, forcing a probe; a third insert must fail, not corrupt.
#[test]
fn two_colliding_keys_then_exhaustion() {
    // "a", "c", "e" all have even DJB2 values: natural index 0 of 2.
    assert_eq!(djb2(b"a") % 2, djb2(b"c") % 2);
    assert_eq!(djb2(b"a") % 2, djb2(b"e") % 2);

    let mut store: ProbedStore<String, i32> = ProbedStore::with_capacity(2);
    let ra = store.insert("a".to_string(), 1).unwrap();
    let rc = store.insert("c".to_string(), 3).unwrap();
    assert_ne!(ra.slot(), rc.slot(), "probe must displace the second key");

    assert_eq!(
        store.insert("e".to_string(), 5),
        Err(StoreError::CapacityExhausted)
    );
    assert_eq!(store.len(), 2);

    // The displaced entry is found by replaying the probe sequence.
    assert_eq!(store.get("a"), Some(&1));
    assert_eq!(store.get("c"), Some(&3));
    assert_eq!(store.lookup("e"), None);
}

// DJB2 is pure: repeated lookups of the same key keep resolving to the
// same slot and entry.
#[test]
fn lookup_is_deterministic() {
    let mut store: ProbedStore<String, i32> = ProbedStore::new();
    assert_eq!(store.capacity(), DEFAULT_CAPACITY);
    let r = store.insert("John Smith".to_string(), 42).unwrap();
    for _ in 0..50 {
        assert_eq!(store.lookup("John Smith"), Some(r));
    }
}

// Default-capacity store behaves like a plain map while sparsely filled.
#[test]
fn sparse_fill_round_trip() {
    let mut store: ProbedStore<String, usize> = ProbedStore::new();
    let keys: Vec<String> = (0..100).map(|i| format!("key-{i}")).collect();
    for (i, k) in keys.iter().enumerate() {
        store.insert(k.clone(), i).unwrap();
    }
    assert_eq!(store.len(), 100);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(store.get(k.as_str()), Some(&i));
    }
    assert_eq!(store.lookup("key-100"), None);
}
