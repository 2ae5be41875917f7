//! Throughput counters shared between producers and the consumer thread.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::output::Batch;

#[derive(Debug, Default)]
pub struct WriterStats {
    lines_enqueued: AtomicU64,
    lines_dropped: AtomicU64,
    lines_flushed: AtomicU64,
    batches_flushed: AtomicU64,
    chars_flushed: AtomicU64,
}

impl WriterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_enqueue(&self) {
        self.lines_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// A line was accepted by `enqueue` but the consumer was already gone.
    pub fn record_drop(&self) {
        self.lines_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flush(&self, batch: &Batch) {
        self.lines_flushed
            .fetch_add(batch.lines as u64, Ordering::Relaxed);
        self.chars_flushed
            .fetch_add(batch.chars as u64, Ordering::Relaxed);
        self.batches_flushed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_enqueued: self.lines_enqueued.load(Ordering::Relaxed),
            lines_dropped: self.lines_dropped.load(Ordering::Relaxed),
            lines_flushed: self.lines_flushed.load(Ordering::Relaxed),
            batches_flushed: self.batches_flushed.load(Ordering::Relaxed),
            chars_flushed: self.chars_flushed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`WriterStats`].
///
/// Counters are read individually, so a snapshot taken while the writer is
/// busy may be slightly inconsistent across fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub lines_enqueued: u64,
    pub lines_dropped: u64,
    pub lines_flushed: u64,
    pub batches_flushed: u64,
    pub chars_flushed: u64,
}

impl StatsSnapshot {
    /// Lines accepted but not yet delivered (or lost to a sink failure).
    pub fn lines_pending(&self) -> u64 {
        self.lines_enqueued
            .saturating_sub(self.lines_dropped)
            .saturating_sub(self.lines_flushed)
    }
}
