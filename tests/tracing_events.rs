// ==============================================
// TRACING EVENT TESTS (integration)
// ==============================================
//
// Captures the fmt subscriber's output to check that eviction, loader failure
// and rejected configuration each emit one event with their fields.

#![cfg(feature = "tracing")]

use std::io;
use std::sync::{Arc, Mutex};

use lrumap::lru::LruMap;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn contents(&self) -> String {
        String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(f: impl FnOnce()) -> String {
    let writer = CaptureWriter::new();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    writer.contents()
}

#[test]
fn eviction_emits_trace_with_cause() {
    let output = capture(|| {
        let mut map = LruMap::new(1);
        map.set(1u32, 1u32);
        map.set(2, 2);
    });

    let line = output
        .lines()
        .find(|line| line.contains("evicting least recently used entry"))
        .unwrap();
    assert!(line.contains("TRACE"));
    assert!(line.contains("capacity=1"));
    assert!(line.contains("len=1"));
    assert!(line.contains("cause=\"evicted\""));
}

#[test]
fn loader_failure_emits_trace() {
    let output = capture(|| {
        let mut map: LruMap<u32, u32> = LruMap::new(4);
        let _ = map.get_or_compute(7, |_| Err("unavailable"));
    });

    assert!(output.contains("loader failed, map unchanged"));
    assert!(output.contains("capacity=4"));
}

#[test]
fn rejected_capacity_emits_debug() {
    let output = capture(|| {
        assert!(LruMap::<u8, u8>::try_new(0).is_err());
    });

    let line = output
        .lines()
        .find(|line| line.contains("rejected lru map configuration"))
        .unwrap();
    assert!(line.contains("DEBUG"));
    assert!(line.contains("capacity=0"));
}

#[test]
fn hits_emit_nothing() {
    let output = capture(|| {
        let mut map = LruMap::new(2);
        map.set("a", 1);
        map.get("a");
        map.delete("a");
    });
    assert!(output.is_empty());
}
