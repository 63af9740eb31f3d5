#![cfg(test)]

// Property tests for SymTable kept inside the crate so they can check the
// chain invariants after every operation.

use crate::ladder::Layout;
use crate::sym_table::SymTable;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Operations name a symbol by its slot in a small per-case pool, so repeated
// puts and removes hit the same keys and a failing case shrinks to few symbols.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Replace(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_against_model(
    layout: Layout,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut sut: SymTable<String, i32> = SymTable::with_layout(layout).unwrap();
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                let inserted = sut.put(k.as_str(), v).unwrap();
                prop_assert_eq!(inserted, !already, "put inserts iff key absent");
                model.entry(k.clone()).or_insert(v);
            }
            OpI::Replace(i, v) => {
                let k = &pool[i];
                let prev = sut.replace(k.as_str(), v);
                let mprev = model.get_mut(k).map(|m| std::mem::replace(m, v));
                prop_assert_eq!(prev, mprev);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
                prop_assert!(!sut.contains(k.as_str()));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k.as_str()) {
                    *v = v.saturating_add(d);
                }
                if let Some(m) = model.get_mut(k) {
                    *m = m.saturating_add(d);
                }
            }
            OpI::Iterate => {
                let mut visits = 0usize;
                let mut s_keys = BTreeSet::new();
                sut.for_each(|k, v| {
                    visits += 1;
                    s_keys.insert((k.clone(), *v));
                });
                let m_keys: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(visits, model.len(), "each binding visited once");
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Post-conditions after each op
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.capacity(), layout.initial_capacity());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - A duplicate `put` is rejected and keeps the first value.
// - `replace`/`remove` return the prior value exactly when the model has one.
// - `get`/`contains` parity with the model, including keys outside the pool.
// - `for_each` visits the model's bindings, each exactly once.
// - Chains stay consistent and `len` matches the model after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(Layout::Resizable, &pool, ops)?;
    }
}

// Property: Same state-machine invariants with every binding in one chain,
// which stresses head, middle and tail unlinking.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_scenario()) {
        run_against_model(Layout::List, &pool, ops)?;
    }
}

// Property: Inserting many distinct keys (enough to cross one or two rungs)
// then removing a subset keeps every survivor retrievable and the capacity
// on the ladder.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_bindings(
        keys in proptest::collection::hash_set("[a-z0-9]{1,8}", 0..1500),
        drop_every in 2usize..7,
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut sut: SymTable<String, usize> = SymTable::new().unwrap();
        for (i, k) in keys.iter().enumerate() {
            prop_assert!(sut.put(k.as_str(), i).unwrap());
        }
        let expected_cap = match keys.len() {
            n if n < 509 => 509,
            n if n < 1021 => 1021,
            _ => 2039,
        };
        prop_assert_eq!(sut.capacity(), expected_cap);

        for (i, k) in keys.iter().enumerate().filter(|(i, _)| i % drop_every == 0) {
            prop_assert_eq!(sut.remove(k.as_str()), Some(i));
        }
        prop_assert_eq!(sut.capacity(), expected_cap);
        sut.assert_consistent();
        for (i, k) in keys.iter().enumerate() {
            let want = if i % drop_every == 0 { None } else { Some(&i) };
            prop_assert_eq!(sut.get(k.as_str()), want);
        }
    }
}
