#![cfg(test)]

// Property tests for ByteMap kept inside the crate so they can check the
// raw slot invariants after every operation.

use crate::hash::{hash_bytes, DefaultKeyHasher, KeyHasher};
use crate::key_size::whole;
use crate::ByteMap;
use hashbrown::HashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Replace(usize, i32),
    Emplace(usize, i32),
    Remove(usize),
    Take(usize),
    Get(usize),
    Contains(Vec<u8>),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<OpI>)> {
    // Lengths straddle the 8-byte short path and the double-stride path.
    proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..20), 1..=24).prop_flat_map(
        |pool| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
                (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Emplace(i, v)),
                idx.clone().prop_map(OpI::Remove),
                idx.clone().prop_map(OpI::Take),
                idx.clone().prop_map(OpI::Get),
                prop_oneof![
                    contains_pool,
                    proptest::collection::vec(any::<u8>(), 0..20)
                ]
                .prop_map(OpI::Contains),
                (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
                Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
        },
    )
}

// Every key in one probe run.
#[derive(Clone, Copy, Default)]
struct ConstHasher;
impl KeyHasher for ConstHasher {
    fn hash_key(&self, _key: &[u8]) -> u64 {
        0
    }
}

// Four homes only, so runs interleave entries with different homes.
#[derive(Clone, Copy, Default)]
struct LowEntropyHasher;
impl KeyHasher for LowEntropyHasher {
    fn hash_key(&self, key: &[u8]) -> u64 {
        hash_bytes(key) & 3
    }
}

// State-machine equivalence against hashbrown::HashMap.
// Invariants checked after every operation:
// - Return values of insert/replace/emplace/remove/take/get/contains match the model.
// - Every occupied slot is reachable from its home, capacity is 0 or a power of
//   two, and the load factor holds.
// - `len` equals the model's length; the value-release hook has fired once per
//   removed entry and for nothing else. On drop it fires once per remaining entry.
fn run_state_machine<S: KeyHasher>(
    hasher: S,
    pool: &[Vec<u8>],
    ops: &[OpI],
) -> Result<(), TestCaseError> {
    let released = Rc::new(Cell::new(0usize));
    let counter = released.clone();
    let mut sut: ByteMap<i32, S> = ByteMap::builder()
        .key_size(whole)
        .hasher(hasher)
        .free_value(move |_| counter.set(counter.get() + 1))
        .build()
        .expect("key size is set");
    let mut model: HashMap<Vec<u8>, i32> = HashMap::new();
    let mut expected_released = 0usize;

    for op in ops.iter().cloned() {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).unwrap();
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Replace(i, v) => {
                let k = &pool[i];
                let prev = sut.replace(k, v).unwrap();
                let expected = model.get_mut(k).map(|m| std::mem::replace(m, v));
                prop_assert_eq!(prev, expected);
            }
            OpI::Emplace(i, v) => {
                let k = &pool[i];
                let current = sut.emplace(k, v).unwrap().copied();
                let expected = match model.get(k) {
                    Some(&c) => Some(c),
                    None => {
                        model.insert(k.clone(), v);
                        None
                    }
                };
                prop_assert_eq!(current, expected);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k).unwrap();
                let expected = model.remove(k).is_some();
                prop_assert_eq!(removed, expected);
                if expected {
                    expected_released += 1;
                }
            }
            OpI::Take(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.take(k).unwrap(), model.remove(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k).unwrap().copied(), model.get(k).copied());
            }
            OpI::Contains(k) => {
                prop_assert_eq!(sut.contains(&k).unwrap(), model.contains_key(&k));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k).unwrap(), model.get_mut(k)) {
                    (Some(s), Some(m)) => {
                        *s = s.saturating_add(d);
                        *m = m.saturating_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence differs: {:?} vs {:?}", s, m),
                }
            }
            OpI::Iterate => {
                let s: BTreeSet<(Vec<u8>, i32)> =
                    sut.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
                let m: BTreeSet<(Vec<u8>, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(released.get(), expected_released);
    }

    drop(sut);
    prop_assert_eq!(released.get(), expected_released + model.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(DefaultKeyHasher, &pool, &ops)?;
    }

    // Worst case: a single probe run holding every key.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(ConstHasher, &pool, &ops)?;
    }

    // Runs mixing several homes, which is where backward shifts must decide
    // per entry whether it may move.
    #[test]
    fn prop_state_machine_with_low_entropy_hash((pool, ops) in arb_scenario()) {
        run_state_machine(LowEntropyHasher, &pool, &ops)?;
    }
}
