//! String keys, integer values, and a hook that prints every removal.
//!
//! Run with: cargo run --example basic_lru_map
//!
//! Expected output:
//!
//! ```text
//! Removed entry with key: "1", value: 1 (Evicted)
//! Removed entry with key: "2", value: 2 (Replaced)
//! Removed entry with key: "3", value: 3 (Evicted)
//! Removed entry with key: "5", value: 5 (Deleted)
//! ```

use lrumap::prelude::*;

fn main() -> Result<(), ConfigError> {
    let mut map = LruMap::builder(10)
        .on_remove(|key: &String, value: &i32, cause| {
            println!("Removed entry with key: {key:?}, value: {value} ({cause:?})");
        })
        .try_build()?;

    for i in 0..map.capacity() as i32 {
        map.set(i.to_string(), i);
    }

    assert!(map.get("xyz").is_none());

    // "0" moves to the front, leaving "1" as the least recently used
    assert_eq!(map.get("0"), Some(&0));
    map.set("11".to_string(), 11);

    map.set("2".to_string(), 222);
    let v = map.get_or_compute("2".to_string(), |_| -> Result<i32, String> {
        unreachable!("2 is cached")
    });
    assert_eq!(v, Ok(&222));

    // miss: loads 12 and evicts "3"
    let v = map.get_or_compute("12".to_string(), |_| Ok::<_, String>(12));
    assert_eq!(v, Ok(&12));

    map.delete("5");

    println!(
        "{} entries, most recent first: {:?}",
        map.len(),
        map.keys().collect::<Vec<_>>()
    );
    Ok(())
}
