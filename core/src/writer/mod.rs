//! Public writer handle and the shutdown protocol.
//!
//! [`AsyncLineWriter`] owns the producer end of the handoff queue and the
//! consumer thread. Producers call [`enqueue`](AsyncLineWriter::enqueue)
//! from any thread (share the writer through an `Arc`); the consumer thread
//! batches lines and hands them to the sink.
//!
//! Shutdown: the first [`dispose`](AsyncLineWriter::dispose) call moves the
//! lifecycle to `Disposing`, wakes the consumer, and blocks until the
//! consumer has finished its final drain and exited. Later calls log a
//! warning and return immediately. Dropping the writer disposes it.

mod consumer;

use std::sync::{Arc, Mutex};
use std::thread::{JoinHandle, ThreadId};

use tracing::{debug, warn};

use crate::config::WriterConfig;
use crate::errors::{ConsumerExit, SinkError, WriterError};
use crate::output::BatchBuffer;
use crate::sink::{FnSink, TextSink};
use crate::stats::{StatsSnapshot, WriterStats};
use crate::sync::{
    handoff_queue, lock, Completion, FlushGate, Lifecycle, QueueProducer, WakeSignal,
};

use consumer::{consumer_main, Consumer};

/// Asynchronous batching line writer.
///
/// Disposing (or dropping the last handle) from inside the sink only
/// requests shutdown: the consumer thread cannot wait for itself, so the
/// call returns at once and the consumer exits after its current cycle.
pub struct AsyncLineWriter {
    producer: QueueProducer,
    signal: Arc<WakeSignal>,
    completion: Arc<Completion>,
    gate: FlushGate,
    stats: Arc<WriterStats>,
    consumer_handle: Mutex<Option<JoinHandle<()>>>,
    consumer_thread: ThreadId,
}

impl AsyncLineWriter {
    /// Start a writer with the default configuration and a closure sink.
    pub fn new<F>(sink: F) -> Result<Self, WriterError>
    where
        F: FnMut(&str) -> Result<(), SinkError> + Send + 'static,
    {
        Self::with_sink(WriterConfig::default(), FnSink::new(sink))
    }

    /// Start a writer with an explicit configuration and sink.
    ///
    /// The consumer thread is running when this returns.
    pub fn with_sink<S: TextSink>(config: WriterConfig, sink: S) -> Result<Self, WriterError> {
        config.validate()?;

        let (producer, queue) = handoff_queue();
        let signal = Arc::new(WakeSignal::new());
        let completion = Arc::new(Completion::new());
        let gate = FlushGate::new();
        let stats = Arc::new(WriterStats::new());

        let consumer = Consumer {
            queue,
            buffer: BatchBuffer::new(config.capacity),
            sink,
            signal: signal.clone(),
            gate: gate.clone(),
            stats: stats.clone(),
        };

        let completion_clone = completion.clone();
        let handle = std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || consumer_main(consumer, completion_clone))
            .map_err(|e| {
                WriterError::SpawnFailed(format!("Failed to spawn writer consumer: {e}"))
            })?;

        debug!(
            "Writer started (capacity {}, thread {})",
            config.capacity, config.thread_name
        );

        let consumer_thread = handle.thread().id();

        Ok(Self {
            producer,
            signal,
            completion,
            gate,
            stats,
            consumer_handle: Mutex::new(Some(handle)),
            consumer_thread,
        })
    }

    /// Queue a line for the consumer. Never blocks and never fails.
    ///
    /// Best-effort once `dispose` has returned or the consumer stopped on a
    /// sink failure: the line is accepted and silently dropped.
    pub fn enqueue(&self, line: impl Into<String>) {
        self.stats.record_enqueue();
        if !self.producer.enqueue(line.into()) {
            self.stats.record_drop();
        }
        self.signal.set();
    }

    /// Stop the writer, blocking until every queued line has been handed to
    /// the sink and the consumer thread has exited.
    ///
    /// Idempotent: only the first call does anything. Called from inside
    /// the sink it only requests shutdown and returns without waiting.
    pub fn dispose(&self) {
        if !self.shutdown() {
            warn!("Writer already disposed; ignoring dispose");
        }
    }

    /// Returns `false` when shutdown had already been requested.
    fn shutdown(&self) -> bool {
        if !self.signal.request_dispose() {
            return false;
        }
        if std::thread::current().id() == self.consumer_thread {
            debug!("Writer disposed from its own consumer thread; not waiting");
            return true;
        }
        debug!("Writer disposing; waiting for final drain");

        let exit = self.completion.wait();
        if let Some(handle) = lock(&self.consumer_handle).take() {
            if handle.join().is_err() {
                warn!("Writer consumer thread ended abnormally");
            }
        }
        debug!("Writer disposed: {:?}", exit);
        true
    }

    /// Read-only view of the flush-in-progress gate.
    pub fn flush_gate(&self) -> FlushGate {
        self.gate.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.signal.lifecycle()
    }

    /// How the consumer thread ended, or `None` while it is still running.
    pub fn exit_status(&self) -> Option<ConsumerExit> {
        self.completion.get()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for AsyncLineWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
