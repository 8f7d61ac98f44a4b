// ==============================================
// CONCURRENT LRU MAP TESTS (integration)
// ==============================================
//
// Multi-threaded use of ConcurrentLruMap. Every operation serializes on one
// lock, so these check that the invariants and the hook accounting hold up
// under contention rather than any particular interleaving.

#![cfg(feature = "concurrency")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use lrumap::builder::LruMapBuilder;
use lrumap::lru::{ConcurrentLruMap, RemovalCause};

mod contention {
    use super::*;

    #[test]
    fn mixed_workload_keeps_invariants() {
        let map: ConcurrentLruMap<u64, u64> = ConcurrentLruMap::new(64);
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let map = map.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..5_000u64 {
                        let key = (i * 31 + t * 7) % 256;
                        match i % 4 {
                            0 => {
                                map.set(key, key);
                            },
                            1 => {
                                if let Some(v) = map.get(&key) {
                                    assert_eq!(v, key);
                                }
                            },
                            2 => {
                                let v = map.get_or_compute(key, |k| Ok::<_, ()>(*k)).unwrap();
                                assert_eq!(v, key);
                            },
                            _ => {
                                map.delete(&key);
                            },
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(map.len() <= 64);
        map.check_invariants().unwrap();
    }

    #[test]
    fn hook_accounting_balances() {
        let inserted = Arc::new(AtomicUsize::new(0));
        let departed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&departed);

        let map = LruMapBuilder::new(16)
            .on_remove(move |_: &u64, _: &u64, cause| {
                if cause != RemovalCause::Replaced {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .try_build_concurrent()
            .unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let map = map.clone();
                let inserted = Arc::clone(&inserted);
                thread::spawn(move || {
                    for i in 0..2_000u64 {
                        if map.set(t * 10_000 + i, i).is_none() {
                            inserted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            inserted.load(Ordering::SeqCst),
            departed.load(Ordering::SeqCst) + map.len()
        );
    }

    #[test]
    fn concurrent_misses_load_once_per_key() {
        let loads = Arc::new(AtomicUsize::new(0));
        let map: ConcurrentLruMap<u32, u32> = ConcurrentLruMap::new(8);
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let map = map.clone();
                let loads = Arc::clone(&loads);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    map.get_or_compute(42, |_| {
                        loads.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ()>(1)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(1));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}

mod locking {
    use super::*;

    #[test]
    fn with_lock_groups_operations() {
        let map: ConcurrentLruMap<&str, i32> = ConcurrentLruMap::new(3);
        map.with_lock(|m| {
            m.set("a", 1);
            m.set("b", 2);
            m.get("a");
        });
        assert_eq!(map.with_lock(|m| m.peek_lru().map(|(k, _)| *k)), Some("b"));
        assert_eq!(map.pop_lru(), Some(("b", 2)));
        assert!(map.touch("a"));
        assert_eq!(map.peek("a"), Some(1));
    }

    #[test]
    fn clear_and_capacity_through_handle() {
        let map = ConcurrentLruMap::try_new(5).unwrap();
        for i in 0..5 {
            map.set(i, i);
        }
        assert_eq!(map.capacity(), 5);
        map.clear();
        assert!(map.is_empty());
        assert!(ConcurrentLruMap::<u8, u8>::try_new(0).is_err());
    }
}
