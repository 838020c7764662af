// KeyTable property tests.
//
// Property 1: model equivalence against std's HashMap.
//  - Operations: insert, delete, lookup, explicit resize, retain.
//  - Invariants after every step: count matches the model, the load bound
//    holds, every model entry is lookupable, validate() passes.
//
// Property 2: key ownership balance for text keys.
//  - copies - releases == count() after every step; zero after drop.
//
// Property 3: resize preserves content and clears tombstones.
use std::cell::Cell;
use std::collections::HashMap;

use keyops_hash::FnKeys;
use keyops_hash::Inserted;
use keyops_hash::KeyOps;
use keyops_hash::KeyTable;
use keyops_hash::StrKeys;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Delete(usize),
    Lookup(usize),
    Resize(usize),
    RetainEven,
}

fn arb_ops() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Delete),
            2 => idx.clone().prop_map(Op::Lookup),
            1 => (0usize..200).prop_map(Op::Resize),
            1 => Just(Op::RetainEven),
        ];
        (Just(pool), proptest::collection::vec(op, 1..200))
    })
}

fn assert_load_bound<O: KeyOps, V>(table: &KeyTable<O, V>) -> Result<(), TestCaseError> {
    prop_assert!(3 * (table.count() + table.tombstones()) <= 2 * table.capacity());
    prop_assert!(table.capacity().is_power_of_two());
    Ok(())
}

#[derive(Default)]
struct CountingStrKeys {
    copies: Cell<usize>,
    releases: Cell<usize>,
}

impl KeyOps for CountingStrKeys {
    type Key = str;
    type Owned = Box<str>;

    fn hash(&self, key: &str) -> u64 {
        StrKeys.hash(key)
    }

    fn compare(&self, key1: &str, key2: &str) -> bool {
        key1 == key2
    }

    fn copy_key(&self, key: &str) -> Box<str> {
        self.copies.set(self.copies.get() + 1);
        key.into()
    }

    fn release_key(&self, key: Box<str>) {
        self.releases.set(self.releases.get() + 1);
        drop(key);
    }
}

proptest! {
    #[test]
    fn prop_matches_model((pool, ops) in arb_ops()) {
        let mut table = KeyTable::with_capacity(4, StrKeys).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let key = &pool[i];
                    let expected = model.insert(key.clone(), v);
                    let inserted = table.insert(key, v).unwrap();
                    match expected {
                        Some(old) => {
                            prop_assert_eq!(inserted, Inserted::Replaced(old));
                        }
                        None => prop_assert_eq!(inserted, Inserted::New),
                    }
                    assert_load_bound(&table)?;
                }
                Op::Delete(i) => {
                    let key = &pool[i];
                    let before = table.count();
                    let removed = table.delete(key);
                    prop_assert_eq!(removed, model.remove(key).is_some());
                    prop_assert_eq!(table.count(), if removed { before - 1 } else { before });
                    prop_assert!(!table.contains_key(key));
                }
                Op::Lookup(i) => {
                    let key = &pool[i];
                    prop_assert_eq!(table.lookup(key), model.get(key));
                    prop_assert_eq!(table.contains_key(key), model.contains_key(key));
                }
                Op::Resize(n) => {
                    table.resize(n).unwrap();
                    prop_assert_eq!(table.tombstones(), 0);
                    prop_assert!(table.capacity() >= n);
                    assert_load_bound(&table)?;
                }
                Op::RetainEven => {
                    table.retain(|_, v| *v % 2 == 0);
                    model.retain(|_, v| *v % 2 == 0);
                }
            }

            prop_assert_eq!(table.count(), model.len());
            prop_assert_eq!(table.validate(), Ok(()));
        }

        for (key, value) in &model {
            prop_assert_eq!(table.lookup(key), Some(value));
        }
        prop_assert_eq!(table.iter().count(), model.len());
    }

    #[test]
    fn prop_ownership_calls_balance((pool, ops) in arb_ops()) {
        let counter = CountingStrKeys::default();
        {
            let mut table = KeyTable::new(&counter).unwrap();
            for op in ops {
                match op {
                    Op::Insert(i, v) => {
                        table.insert(&pool[i], v).unwrap();
                    }
                    Op::Delete(i) => {
                        table.delete(&pool[i]);
                    }
                    Op::Lookup(i) => {
                        table.lookup(&pool[i]);
                    }
                    Op::Resize(n) => table.resize(n).unwrap(),
                    Op::RetainEven => table.retain(|_, v| *v % 2 == 0),
                }
                prop_assert_eq!(
                    counter.copies.get() - counter.releases.get(),
                    table.count()
                );
            }
        }
        prop_assert_eq!(counter.copies.get(), counter.releases.get());
    }

    #[test]
    fn prop_resize_preserves_content(
        keys in proptest::collection::hash_set(any::<u32>(), 0..300),
        delete_every in 2usize..5,
        target in 0usize..2048,
    ) {
        let ops = FnKeys::new(
            |k: &u32| (*k as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15),
            |a: &u32, b: &u32| a == b,
            |k: &u32| *k,
            |_: u32| {},
        );
        let mut table = KeyTable::new(ops).unwrap();
        let keys: Vec<u32> = keys.into_iter().collect();
        for &k in &keys {
            table.insert(&k, k as u64 + 1).unwrap();
        }
        for &k in keys.iter().step_by(delete_every) {
            table.delete(&k);
        }
        let live = table.count();

        table.resize(target).unwrap();
        prop_assert_eq!(table.count(), live);
        prop_assert_eq!(table.tombstones(), 0);
        for (i, &k) in keys.iter().enumerate() {
            if i % delete_every == 0 {
                prop_assert_eq!(table.lookup(&k), None);
            } else {
                prop_assert_eq!(table.lookup(&k), Some(&(k as u64 + 1)));
            }
        }
        prop_assert_eq!(table.validate(), Ok(()));
    }
}
