#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can call
// the internal invariant checker.

use crate::chained_hash_map::ChainedHashMap;
use crate::hash::{HashFunction, KeyHasher};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    Contains(String),
    Mutate(usize, i32),
    Resize(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=12, proptest::collection::vec("[a-z]{0,5}", 1..=10)).prop_flat_map(
        |(capacity, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
                2 => idx.clone().prop_map(OpI::Get),
                2 => idx.clone().prop_map(OpI::Remove),
                1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
                1 => (1usize..=24).prop_map(OpI::Resize),
                1 => Just(OpI::Clear),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Every key collides, so each bucket but one stays empty.
#[derive(Clone, Copy, Debug, Default)]
struct ConstHasher;
impl KeyHasher for ConstHasher {
    fn hash_key(&self, _key: &str) -> u64 {
        0
    }
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised after each op:
// - `len` parity with the model; `len` equals the sum of chain lengths.
// - Every entry sits in the bucket its key routes to.
// - `table_load() == len / capacity` and `empty_buckets()` matches the chains.
// - `get`/`contains_key` parity; overwrite returns the old value; remove of
//   an absent key is a no-op.
// - `resize` keeps every pair and adopts the new capacity.
fn run_state_machine<H: KeyHasher>(
    mut sut: ChainedHashMap<String, i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
            }
            OpI::Get(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Remove(i) => {
                let k = pool[i].as_str();
                let before = sut.len();
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k));
                let expected = if removed.is_some() { before - 1 } else { before };
                prop_assert_eq!(sut.len(), expected);
                prop_assert!(!sut.contains_key(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = pool[i].as_str();
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence diverged for {:?}", k),
                }
            }
            OpI::Resize(n) => {
                let snapshot: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                sut.resize(n).expect("non-zero capacity");
                capacity = n;
                prop_assert_eq!(sut.capacity(), n);
                let after: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(after, snapshot);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.empty_buckets(), capacity);
            }
            OpI::Iterate => {
                let keys: Vec<&String> = sut.iter().map(|(k, _)| k).collect();
                let distinct: BTreeSet<&String> = keys.iter().copied().collect();
                prop_assert_eq!(keys.len(), distinct.len(), "duplicate key in table");
                let m_keys: BTreeSet<&String> = model.keys().collect();
                prop_assert_eq!(distinct, m_keys);
            }
        }

        sut.check_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.capacity(), capacity);
        prop_assert_eq!(sut.table_load(), model.len() as f64 / capacity as f64);
        let empty = sut.chains().iter().filter(|c| c.is_empty()).count();
        prop_assert_eq!(sut.empty_buckets(), empty);
        prop_assert_eq!(sut.iter().len(), model.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_codepoint_sum((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hasher(capacity, HashFunction::CodepointSum).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_position_weighted((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hasher(capacity, HashFunction::PositionWeighted).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }

    // Worst-case collisions: every entry shares one chain, stressing
    // head/middle/tail removal and equality resolution.
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hasher(capacity, ConstHasher).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }

    // Load factor: N distinct keys into C buckets gives exactly N / C.
    #[test]
    fn prop_load_factor_exact(capacity in 1usize..64, n in 0usize..200) {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new(capacity).unwrap();
        for i in 0..n {
            m.put(format!("k{i}"), i);
        }
        prop_assert_eq!(m.len(), n);
        prop_assert_eq!(m.table_load(), n as f64 / capacity as f64);
    }
}
