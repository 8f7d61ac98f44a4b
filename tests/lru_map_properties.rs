// ==============================================
// LRU MAP BEHAVIOR TESTS (integration)
// ==============================================
//
// Randomized comparison against a naive recency model, plus end-to-end
// scenarios that exercise the public API only.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use lrumap::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

type Log = Arc<Mutex<Vec<(u32, u32, RemovalCause)>>>;

fn logged_map(capacity: usize) -> (LruMap<u32, u32>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let map = LruMap::builder(capacity)
        .on_remove(move |k: &u32, v: &u32, cause| sink.lock().unwrap().push((*k, *v, cause)))
        .build();
    (map, log)
}

// ==============================================
// Reference Model
// ==============================================
//
// Vector of (key, value), most recent first. Every operation is O(n), which
// is the point: it is too simple to be wrong.

struct Model {
    capacity: usize,
    entries: VecDeque<(u32, u32)>,
    removed: Vec<(u32, u32, RemovalCause)>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
            removed: Vec::new(),
        }
    }

    fn position(&self, key: u32) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    fn promote(&mut self, pos: usize) {
        if let Some(entry) = self.entries.remove(pos) {
            self.entries.push_front(entry);
        }
    }

    fn get(&mut self, key: u32) -> Option<u32> {
        let pos = self.position(key)?;
        self.promote(pos);
        Some(self.entries[0].1)
    }

    fn set(&mut self, key: u32, value: u32) -> Option<u32> {
        if let Some(pos) = self.position(key) {
            self.promote(pos);
            let old = std::mem::replace(&mut self.entries[0].1, value);
            self.removed.push((key, old, RemovalCause::Replaced));
            return Some(old);
        }
        if self.entries.len() == self.capacity {
            if let Some((k, v)) = self.entries.pop_back() {
                self.removed.push((k, v, RemovalCause::Evicted));
            }
        }
        self.entries.push_front((key, value));
        None
    }

    fn delete(&mut self, key: u32) -> Option<u32> {
        let pos = self.position(key)?;
        let (k, v) = self.entries.remove(pos)?;
        self.removed.push((k, v, RemovalCause::Deleted));
        Some(v)
    }

    fn pop_lru(&mut self) -> Option<(u32, u32)> {
        let (k, v) = self.entries.pop_back()?;
        self.removed.push((k, v, RemovalCause::Evicted));
        Some((k, v))
    }

    fn keys(&self) -> Vec<u32> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }
}

fn run_against_model(seed: u64, capacity: usize, key_space: u32, steps: usize) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (mut map, log) = logged_map(capacity);
    let mut model = Model::new(capacity);

    for step in 0..steps {
        let key = rng.random_range(0..key_space);
        match rng.random_range(0..100u32) {
            0..=29 => assert_eq!(map.get(&key).copied(), model.get(key), "get {key} @ {step}"),
            30..=59 => {
                let value = rng.random::<u32>();
                assert_eq!(map.set(key, value), model.set(key, value), "set {key} @ {step}");
            },
            60..=69 => assert_eq!(map.delete(&key), model.delete(key), "delete {key} @ {step}"),
            70..=79 => {
                let fail = rng.random_bool(0.3);
                let result = map.get_or_compute(key, |k| {
                    if fail { Err(()) } else { Ok(k.wrapping_mul(7)) }
                });
                match model.get(key) {
                    Some(v) => assert_eq!(result, Ok(&v)),
                    None if fail => assert_eq!(result, Err(())),
                    None => {
                        let v = key.wrapping_mul(7);
                        assert_eq!(result, Ok(&v));
                        model.set(key, v);
                    },
                }
            },
            80..=84 => assert_eq!(map.pop_lru(), model.pop_lru(), "pop_lru @ {step}"),
            85..=89 => {
                let found = model.position(key).map(|pos| model.promote(pos)).is_some();
                assert_eq!(map.touch(&key), found);
            },
            90..=94 => assert_eq!(
                map.recency_rank(&key),
                model.position(key),
                "rank {key} @ {step}"
            ),
            _ => assert_eq!(map.peek(&key).copied(), model.position(key).map(|p| model.entries[p].1)),
        }

        assert_eq!(map.len(), model.entries.len());
        assert!(map.allocated_nodes() <= capacity);
        if step % 64 == 0 {
            map.check_invariants().unwrap();
            assert_eq!(map.keys().copied().collect::<Vec<_>>(), model.keys());
        }
    }

    map.check_invariants().unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), model.keys());
    assert_eq!(*log.lock().unwrap(), model.removed);
}

// ==============================================
// Randomized Model Comparison
// ==============================================

mod model_comparison {
    use super::*;

    #[test]
    fn small_map_dense_keys() {
        for seed in 0..16 {
            run_against_model(seed, 4, 8, 2_000);
        }
    }

    #[test]
    fn single_slot() {
        run_against_model(7, 1, 4, 2_000);
    }

    #[test]
    fn wide_key_space() {
        run_against_model(0xfeed, 32, 256, 10_000);
    }

    #[test]
    fn key_space_smaller_than_capacity() {
        // never evicts through set
        run_against_model(99, 64, 16, 5_000);
    }
}

// ==============================================
// End-to-End Scenarios
// ==============================================

mod scenarios {
    use super::*;

    #[test]
    fn string_keys_walkthrough() {
        let removed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&removed);
        let mut map = LruMap::builder(10)
            .on_remove(move |k: &String, v: &i32, _| sink.lock().unwrap().push((k.clone(), *v)))
            .build();

        for i in 0..10 {
            map.set(i.to_string(), i);
        }
        assert!(map.get("xyz").is_none());
        assert!(map.get("0").is_some());
        map.set("11".into(), 11);
        map.set("2".into(), 222);
        assert_eq!(
            map.get_or_compute("2".into(), |_| -> Result<i32, ()> { panic!("loaded a cached key") }),
            Ok(&222)
        );
        assert_eq!(map.get_or_compute("12".into(), |_| Ok::<_, ()>(12)), Ok(&12));
        map.delete("5");

        let removed = removed.lock().unwrap();
        let keys: Vec<&str> = removed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "3", "5"]);
        assert_eq!(removed[1], ("2".to_string(), 2));
        assert_eq!(map.len(), 9);
        map.check_invariants().unwrap();
    }

    #[test]
    fn hook_fires_once_per_departure() {
        let (mut map, log) = logged_map(8);
        for i in 0..100 {
            map.set(i, i);
        }
        for i in 92..96 {
            map.delete(&i);
        }
        map.clear();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 100);
        let mut keys: Vec<u32> = log.iter().map(|(k, _, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 100);
        assert_eq!(
            log.iter().filter(|(_, _, c)| *c == RemovalCause::Evicted).count(),
            92
        );
    }

    #[test]
    fn failing_loader_preserves_error_and_state() {
        #[derive(Debug, PartialEq)]
        enum LoadError {
            NotFound(u32),
        }

        let (mut map, log) = logged_map(2);
        map.set(1, 1);
        map.set(2, 2);

        let err = map.get_or_compute(3, |k| Err(LoadError::NotFound(*k)));
        assert_eq!(err, Err(LoadError::NotFound(3)));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 1]);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn nodes_are_recycled_across_clear() {
        let mut map = LruMap::new(128);
        for round in 0..10u64 {
            for i in 0..1_000u64 {
                map.set(round * 1_000 + i, i);
            }
            map.clear();
            assert_eq!(map.free_nodes(), 128);
        }
        assert_eq!(map.allocated_nodes(), 128);
    }

    #[test]
    fn zero_capacity_rejected_everywhere() {
        assert!(LruMap::<u8, u8>::try_new(0).is_err());
        assert!(LruMapBuilder::<u8, u8>::new(0).try_build().is_err());
    }
}
