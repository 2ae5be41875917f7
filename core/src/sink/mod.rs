//! Batch delivery abstraction.
//!
//! The writer owns exactly one [`TextSink`] and calls it synchronously from
//! the consumer thread, once per flushed batch. Implementations must be
//! `Send + 'static` so they can be moved into that thread. Taking
//! `&mut self` lets a sink keep its own buffered state without locking.
//!
//! Stock implementations:
//! - [`FnSink`]: adapts a closure.
//! - [`FileSink`]: appends batches to a file.
//! - [`MemorySink`]: records batches in memory for later inspection.

pub mod file;
pub mod memory;

use crate::errors::SinkError;

pub use file::FileSink;
pub use memory::{MemorySink, MemorySinkHandle};

/// Receiver of flushed batches.
pub trait TextSink: Send + 'static {
    /// Accept one batch: lines joined by
    /// [`LINE_SEPARATOR`](crate::config::LINE_SEPARATOR), no trailing
    /// separator.
    ///
    /// An `Err` stops the writer. Nothing is retried.
    fn write_batch(&mut self, text: &str) -> Result<(), SinkError>;
}

impl<S: TextSink + ?Sized> TextSink for Box<S> {
    fn write_batch(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).write_batch(text)
    }
}

/// Closure-backed sink.
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&str) -> Result<(), SinkError> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TextSink for FnSink<F>
where
    F: FnMut(&str) -> Result<(), SinkError> + Send + 'static,
{
    fn write_batch(&mut self, text: &str) -> Result<(), SinkError> {
        (self.f)(text)
    }
}
