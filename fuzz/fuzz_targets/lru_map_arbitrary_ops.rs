#![no_main]

use std::sync::{Arc, Mutex};

use libfuzzer_sys::fuzz_target;
use lrumap::lru::{LruMap, RemovalCause};

// Fuzz arbitrary operation sequences on LruMap
//
// The first byte picks the capacity; then each (op, key) byte pair drives
// set, get, delete, get_or_compute (ok and failing), touch, pop_lru, peek and
// clear. Hook notifications are counted and balanced against the inserts.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 16) + 1;

    let departed = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&departed);
    let mut map = LruMap::builder(capacity)
        .on_remove(move |_: &u8, _: &u16, cause| {
            if cause != RemovalCause::Replaced {
                *sink.lock().unwrap() += 1;
            }
        })
        .build();
    let mut inserted = 0usize;

    for pair in ops.chunks_exact(2) {
        let key = pair[1] % 32;
        match pair[0] % 10 {
            0 | 1 => {
                if map.set(key, u16::from(pair[0])).is_none() {
                    inserted += 1;
                }
                assert_eq!(map.recency_rank(&key), Some(0));
            }
            2 => {
                if map.get(&key).is_some() {
                    assert_eq!(map.keys().next(), Some(&key));
                }
            }
            3 => {
                let had = map.contains(&key);
                assert_eq!(map.delete(&key).is_some(), had);
                assert!(!map.contains(&key));
            }
            4 => {
                let had = map.contains(&key);
                let value = map.get_or_compute(key, |k| Ok::<_, ()>(u16::from(*k))).copied();
                assert!(value.is_ok());
                if !had {
                    inserted += 1;
                }
            }
            5 => {
                let before: Vec<u8> = map.keys().copied().collect();
                let had = map.contains(&key);
                let result = map.get_or_compute(key, |_| Err::<u16, _>("fail"));
                assert_eq!(result.is_ok(), had);
                if !had {
                    assert_eq!(map.keys().copied().collect::<Vec<_>>(), before);
                }
            }
            6 => {
                let had = map.contains(&key);
                assert_eq!(map.touch(&key), had);
            }
            7 => {
                let lru = map.peek_lru().map(|(k, _)| *k);
                assert_eq!(map.pop_lru().map(|(k, _)| k), lru);
            }
            8 => {
                let _ = map.peek(&key);
            }
            _ => {
                map.clear();
                assert!(map.is_empty());
            }
        }

        assert!(map.len() <= capacity);
        assert!(map.allocated_nodes() <= capacity);
        assert_eq!(inserted, *departed.lock().unwrap() + map.len());
    }

    map.check_invariants().unwrap();
});
