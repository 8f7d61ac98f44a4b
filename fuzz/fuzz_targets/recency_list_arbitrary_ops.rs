#![no_main]

use libfuzzer_sys::fuzz_target;
use lrumap::ds::RecencyList;

// Fuzz arbitrary operation sequences on RecencyList
//
// Ids are kept after removal on purpose: stale ids may alias recycled nodes,
// and the ring must stay consistent either way.
fuzz_target!(|data: &[u8]| {
    let mut list: RecencyList<u32> = RecencyList::new();
    let mut ids = Vec::new();
    let mut stamp = 0u64;

    for pair in data.chunks_exact(2) {
        let value = u32::from(pair[1]);
        stamp += 1;

        match pair[0] % 7 {
            0 | 1 => {
                let id = list.push_front(value, stamp);
                ids.push(id);
                assert_eq!(list.front(), Some(id));
                assert_eq!(list.get(id), Some(&value));
            }
            2 => {
                if let Some(&id) = ids.get(value as usize % ids.len().max(1)) {
                    if list.move_to_front(id) {
                        assert_eq!(list.front(), Some(id));
                    }
                }
            }
            3 => {
                if let Some(&id) = ids.get(value as usize % ids.len().max(1)) {
                    let live = list.contains(id);
                    assert_eq!(list.remove(id).is_some(), live);
                    assert!(!list.contains(id));
                }
            }
            4 => {
                let before = list.len();
                let popped = list.pop_back();
                assert_eq!(popped.is_some(), before > 0);
            }
            5 => {
                if let Some(&id) = ids.get(value as usize % ids.len().max(1)) {
                    if list.unlink(id) {
                        assert!(list.link_front(id));
                        assert_eq!(list.front(), Some(id));
                    }
                }
            }
            _ => {
                let forward: Vec<u32> = list.iter().copied().collect();
                assert_eq!(forward.len(), list.len());
            }
        }

        assert!(list.pool().slot_count() <= ids.len());
    }

    list.check_invariants().unwrap();
});
