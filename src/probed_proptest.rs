#![cfg(test)]

// Property tests for ProbedStore. The model is deliberately weaker than
// the chained one: whether a given insert succeeds depends on the probe
// sequence reaching an empty slot, which the model does not replicate.
// It checks the guarantees the store does make.

use crate::error::StoreError;
use crate::probed::{ProbedStore, SlotRef};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Lookup(usize),
    Mutate(usize, i32),
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    let capacity = 1usize..16;
    let pool = proptest::collection::vec("[a-z]{0,4}", 1..=10);
    (capacity, pool).prop_flat_map(|(capacity, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Lookup),
            (any::<usize>(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
        ];
        proptest::collection::vec(op, 1..60)
            .prop_map(move |ops| (capacity, pool.clone(), ops))
    })
}

// Property: Probing guarantees under random operation sequences.
// - Empty keys fail with InvalidKey; nothing changes.
// - Successful inserts land on pairwise-distinct slots; `len` equals the
//   number of successes and never exceeds capacity.
// - A failed insert (CapacityExhausted) leaves length and every prior
//   entry intact.
// - `lookup` finds the earliest successful insert of a key (displaced
//   entries included, since lookup replays the probe sequence) and
//   misses keys never successfully inserted.
// - Mutation through a retained ref is visible to later lookups of the
//   earliest entry only when the ref is that earliest entry.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_probing_guarantees((capacity, pool, ops) in arb_scenario()) {
        let mut sut: ProbedStore<String, i32> = ProbedStore::with_capacity(capacity);
        // Value of the earliest successful insert per key.
        let mut first_value: HashMap<String, i32> = HashMap::new();
        // Refs of earliest inserts, for mutation bookkeeping.
        let mut first_ref: HashMap<String, SlotRef> = HashMap::new();
        let mut occupied: BTreeSet<usize> = BTreeSet::new();
        let mut successes = 0usize;

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    if k.is_empty() {
                        prop_assert_eq!(sut.insert(k, v), Err(StoreError::InvalidKey));
                        prop_assert_eq!(sut.len(), successes);
                        continue;
                    }
                    let len_before = sut.len();
                    match sut.insert(k.clone(), v) {
                        Ok(r) => {
                            prop_assert!(occupied.insert(r.slot()), "two entries in one slot");
                            successes += 1;
                            prop_assert_eq!(sut.len(), successes);
                            first_value.entry(k.clone()).or_insert(v);
                            first_ref.entry(k).or_insert(r);
                        }
                        Err(StoreError::CapacityExhausted) => {
                            prop_assert_eq!(sut.len(), len_before, "failed insert must not mutate");
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {e:?}"),
                    }
                }
                OpI::Lookup(i) => {
                    let k = &pool[i];
                    match sut.lookup(k.as_str()) {
                        Some(r) => {
                            prop_assert_eq!(Some(&r), first_ref.get(k), "earliest entry wins");
                            prop_assert_eq!(r.value(&sut), first_value.get(k));
                        }
                        None => prop_assert!(!first_value.contains_key(k)),
                    }
                }
                OpI::Mutate(i, d) => {
                    if first_ref.is_empty() {
                        continue;
                    }
                    let k = {
                        let mut keys: Vec<&String> = first_ref.keys().collect();
                        keys.sort();
                        keys[i % keys.len()].clone()
                    };
                    let r = first_ref[&k];
                    let vr = r.value_mut(&mut sut).expect("refs never go stale");
                    *vr = vr.saturating_add(d);
                    let mv = first_value.get_mut(&k).expect("modeled");
                    *mv = mv.saturating_add(d);
                }
            }

            // Post-conditions after each op
            prop_assert!(sut.len() <= sut.capacity());
            prop_assert_eq!(sut.len(), successes);
            for (k, v) in &first_value {
                prop_assert_eq!(sut.get(k.as_str()), Some(v), "earliest entries stay retrievable");
            }
            prop_assert_eq!(sut.iter().count(), sut.len());
        }
    }
}
