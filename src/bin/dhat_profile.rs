//! DHAT heap profiler for lrumap.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>
//!
//! Once a map is full, eviction recycles nodes instead of allocating, so the
//! churn phases below should report close to zero new blocks.

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lrumap::lru::LruMap;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// 90% of accesses hit 10% of keys; misses load through `get_or_compute`.
fn hotset_workload(map: &mut LruMap<u64, u64>, operations: usize, universe: u64, seed: u64) {
    let mut rng = XorShift64::new(seed);
    let hot_size = (universe as f64 * 0.1) as u64;

    for _ in 0..operations {
        let key = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + (rng.next_u64() % (universe - hot_size))
        };
        let _ = map.get_or_compute(key, |k| Ok::<_, ()>(k ^ 0xdead_beef));
    }
}

/// Sequential keys, every one a miss once the universe exceeds capacity.
fn scan_workload(map: &mut LruMap<u64, u64>, operations: usize, universe: u64) {
    for i in 0..operations {
        let key = (i as u64) % universe;
        if map.get(&key).is_none() {
            map.set(key, key);
        }
    }
}

/// Fresh keys only: one eviction per insert.
fn eviction_churn(map: &mut LruMap<u64, u64>, operations: usize, offset: u64) {
    for i in 0..operations as u64 {
        map.set(offset + i, i);
    }
}

fn report(phase: &str, before: &dhat::HeapStats) {
    let after = dhat::HeapStats::get();
    println!(
        "  {:<14} blocks +{:<8} bytes +{:<10} live {}",
        phase,
        after.total_blocks - before.total_blocks,
        after.total_bytes - before.total_bytes,
        after.curr_bytes
    );
}

fn profile_lru_map() {
    println!("=== Profiling LruMap ===");
    let capacity = 4096;
    let operations = 100_000;
    let universe = 16_384;

    let evicted = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&evicted);
    let mut map = LruMap::builder(capacity)
        .on_remove(move |_: &u64, _: &u64, cause| {
            if cause.was_evicted() {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        })
        .build();

    let stats = dhat::HeapStats::get();
    for i in 0..capacity as u64 {
        map.set(i, i);
    }
    report("warm-up", &stats);

    let stats = dhat::HeapStats::get();
    hotset_workload(&mut map, operations, universe, 42);
    report("hotset", &stats);

    let stats = dhat::HeapStats::get();
    scan_workload(&mut map, operations / 2, universe);
    report("scan", &stats);

    let stats = dhat::HeapStats::get();
    eviction_churn(&mut map, operations / 4, universe);
    report("churn", &stats);

    println!(
        "  Final size: {}  evicted: {}  nodes allocated: {}  free: {}",
        map.len(),
        evicted.load(Ordering::Relaxed),
        map.allocated_nodes(),
        map.free_nodes()
    );

    let stats = dhat::HeapStats::get();
    map.clear();
    for i in 0..capacity as u64 {
        map.set(i, i);
    }
    report("clear+refill", &stats);
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("lrumap DHAT Heap Profiling");
    println!("==========================\n");

    profile_lru_map();

    println!("\n==========================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
