#![cfg(test)]

// Property tests for ChainedStore kept inside the crate so they can use
// the hash module directly when predicting slot indices.

use crate::chained::{ChainRef, ChainedStore};
use crate::error::StoreError;
use crate::hash::{Djb2, SlotHash};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Lookup(usize),
    // Mutate the n-th successful insert through its retained ref.
    Mutate(usize, i32),
    ChainLen(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    // Tiny capacities force chains; pools may contain "" to exercise
    // InvalidKey and duplicate strings to exercise duplicate inserts.
    let capacity = 1usize..8;
    let pool = proptest::collection::vec("[a-z]{0,4}", 1..=8);
    (capacity, pool).prop_flat_map(|(capacity, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Lookup),
            (any::<usize>(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            idx.clone().prop_map(OpI::ChainLen),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60)
            .prop_map(move |ops| (capacity, pool.clone(), ops))
    })
}

// One successful insert: its ref, key, and occurrence index among inserts
// of the same key (chains keep duplicates in arrival order).
#[derive(Clone, Debug)]
struct Record {
    r: ChainRef,
    key: String,
    occurrence: usize,
}

// Property: State-machine equivalence against a multimap model
// (HashMap<String, Vec<i32>> of values in insertion order per key).
// Invariants exercised across random operation sequences:
// - Non-empty keys always insert; "" fails with InvalidKey and mutates nothing.
// - Chaining is never destructive: chain depth at a key's slot equals the
//   number of inserts whose keys share that slot.
// - `lookup` returns the earliest entry for a key; its value matches the
//   model's first value.
// - Retained refs stay valid forever and `value_mut` through them is
//   visible to later lookups.
// - `iter` yields exactly the model's (key, value) multiset; `len` parity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let mut sut: ChainedStore<String, i32> = ChainedStore::with_capacity(capacity);
        let mut model: HashMap<String, Vec<i32>> = HashMap::new();
        let mut records: Vec<Record> = Vec::new();

        prop_assert_eq!(sut.capacity(), capacity);

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    if k.is_empty() {
                        prop_assert_eq!(sut.insert(k, v), Err(StoreError::InvalidKey));
                    } else {
                        let r = sut.insert(k.clone(), v).expect("non-empty key inserts");
                        let values = model.entry(k.clone()).or_default();
                        records.push(Record { r, key: k, occurrence: values.len() });
                        values.push(v);
                    }
                }
                OpI::Lookup(i) => {
                    let k = &pool[i];
                    match sut.lookup(k.as_str()) {
                        Some(r) => {
                            let first = model.get(k).and_then(|vs| vs.first());
                            prop_assert_eq!(r.value(&sut), first, "lookup returns earliest value");
                            // Earliest means the first recorded insert of this key.
                            let earliest = records.iter().find(|rec| &rec.key == k).expect("record exists");
                            prop_assert_eq!(r, earliest.r);
                        }
                        None => prop_assert!(!model.contains_key(k)),
                    }
                }
                OpI::Mutate(i, d) => {
                    if records.is_empty() {
                        continue;
                    }
                    let rec = records[i % records.len()].clone();
                    let vr = rec.r.value_mut(&mut sut).expect("refs never go stale");
                    *vr = vr.saturating_add(d);
                    let mv = &mut model.get_mut(&rec.key).expect("modeled")[rec.occurrence];
                    *mv = mv.saturating_add(d);
                }
                OpI::ChainLen(i) => {
                    let k = &pool[i];
                    if k.is_empty() {
                        prop_assert_eq!(sut.chain_len(k.as_str()), 0);
                        continue;
                    }
                    // Expected depth: all modeled inserts whose keys share
                    // this key's slot, duplicates included.
                    let slot = Djb2.slot_index(k.as_str(), capacity);
                    let expected: usize = model
                        .iter()
                        .filter(|(mk, _)| Djb2.slot_index(mk.as_str(), capacity) == slot)
                        .map(|(_, vs)| vs.len())
                        .sum();
                    prop_assert_eq!(sut.chain_len(k.as_str()), expected);
                }
                OpI::Iterate => {
                    let mut seen: BTreeMap<(String, i32), usize> = BTreeMap::new();
                    for (_r, k, v) in sut.iter() {
                        *seen.entry((k.clone(), *v)).or_default() += 1;
                    }
                    let mut expected: BTreeMap<(String, i32), usize> = BTreeMap::new();
                    for (k, vs) in &model {
                        for v in vs {
                            *expected.entry((k.clone(), *v)).or_default() += 1;
                        }
                    }
                    prop_assert_eq!(seen, expected);
                }
            }

            // Post-conditions after each op
            let total: usize = model.values().map(Vec::len).sum();
            prop_assert_eq!(sut.len(), total);
            prop_assert_eq!(sut.is_empty(), total == 0);
            // Every retained ref still resolves to its key.
            for rec in &records {
                prop_assert_eq!(rec.r.key(&sut), Some(&rec.key));
            }
        }
    }
}
