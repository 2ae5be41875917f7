//! Shared test utilities for linebatch core integration tests.
//!
//! Provides tracing setup, a sink that can hold the consumer thread inside
//! a flush (so tests control exactly which lines share a drain cycle), and
//! polling helpers.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::sync::mpsc;
use std::time::{Duration, Instant};

use linebatch_core::{
    AsyncLineWriter, MemorySink, MemorySinkHandle, SinkError, TextSink, WriterConfig,
    LINE_SEPARATOR,
};

/// Upper bound for anything a test waits on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Line used to park the consumer before the lines under test are queued.
pub const WARMUP_LINE: &str = "__warmup__";

/// Install a fmt subscriber writing through the test harness.
/// Safe to call from every test; only the first call installs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Join lines with the platform separator, the way a batch is built.
pub fn joined(lines: &[&str]) -> String {
    lines.join(LINE_SEPARATOR)
}

/// Sink that records batches and blocks inside its first `write_batch`
/// until released through the paired [`ParkingControl`].
pub struct ParkingSink {
    inner: MemorySink,
    parked_tx: Option<mpsc::Sender<()>>,
    release_rx: Option<mpsc::Receiver<()>>,
}

pub struct ParkingControl {
    parked_rx: mpsc::Receiver<()>,
    release_tx: mpsc::Sender<()>,
}

impl ParkingSink {
    pub fn new() -> (Self, MemorySinkHandle, ParkingControl) {
        let (inner, handle) = MemorySink::new();
        let (parked_tx, parked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        (
            Self {
                inner,
                parked_tx: Some(parked_tx),
                release_rx: Some(release_rx),
            },
            handle,
            ParkingControl {
                parked_rx,
                release_tx,
            },
        )
    }
}

impl TextSink for ParkingSink {
    fn write_batch(&mut self, text: &str) -> Result<(), SinkError> {
        self.inner.write_batch(text)?;
        if let (Some(parked), Some(release)) = (self.parked_tx.take(), self.release_rx.take()) {
            let _ = parked.send(());
            let _ = release.recv_timeout(TEST_TIMEOUT);
        }
        Ok(())
    }
}

impl ParkingControl {
    /// Block until the consumer is held inside the sink.
    pub fn wait_parked(&self) {
        self.parked_rx
            .recv_timeout(TEST_TIMEOUT)
            .expect("consumer should reach the parking sink");
    }

    /// Let the consumer finish its current flush.
    pub fn release(&self) {
        let _ = self.release_tx.send(());
    }
}

/// Start a writer whose consumer is already parked inside the sink.
///
/// The warmup batch is cleared from the handle, so the handle only shows
/// batches produced after [`ParkingControl::release`].
pub fn parked_writer(capacity: usize) -> (AsyncLineWriter, MemorySinkHandle, ParkingControl) {
    init_tracing();
    let (sink, handle, control) = ParkingSink::new();
    let writer = AsyncLineWriter::with_sink(WriterConfig::with_capacity(capacity), sink)
        .expect("writer should start");
    writer.enqueue(WARMUP_LINE);
    control.wait_parked();
    handle.clear();
    (writer, handle, control)
}

/// Writer backed by a plain memory sink.
pub fn memory_writer(capacity: usize) -> (AsyncLineWriter, MemorySinkHandle) {
    init_tracing();
    let (sink, handle) = MemorySink::new();
    let writer = AsyncLineWriter::with_sink(WriterConfig::with_capacity(capacity), sink)
        .expect("writer should start");
    (writer, handle)
}

/// Poll `condition` until it holds or [`TEST_TIMEOUT`] elapses.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TEST_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
